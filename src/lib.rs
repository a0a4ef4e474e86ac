#![cfg_attr(feature = "no_std", no_std)]

//! A minimal reactive component runtime for Rust with `no_std` support.
//!
//! State lives in [`Pointer`]s that change only through transitions, and
//! observable [`State`] cells broadcast every change. A [`Component`] bundles
//! one context (state, dependencies, subscriptions and an invoke queue) with
//! named actions built from pure functions over lensed views of that context.
//!
//! ## Example
//!
//! ```rust
//! use statelet::{
//!     create_action, create_component, Command, Config, Getter, Init, InvokeAction, Lens,
//!     ReaderAction, StateAction,
//! };
//! use statelet::{create_interaction, InteractionDef};
//!
//! #[derive(Clone)]
//! struct Counter { count: i32 }
//!
//! let count = || Lens::new(|s: &Counter| s.count, |count, _: &Counter| Counter { count });
//!
//! let counter = create_component(
//!     Config::new()
//!         .action("inc", create_action(StateAction::lensed(count(), |c: i32, _: ()| ((), c + 1))))
//!         .action("getCount", create_action(ReaderAction::lensed(
//!             Getter::new(|s: &Counter| s.count),
//!             |c: i32, _: ()| c,
//!         )))
//!         .action("announce", create_action(InvokeAction::lensed(
//!             Getter::new(|s: &Counter| s.count),
//!             |c: i32, _: ()| ((), vec![Command::new("log", c)]),
//!         )))
//!         .interaction("log", create_interaction(InteractionDef::new(
//!             |_, count: i32| assert_eq!(count, 2),
//!         ))),
//!     Init::new(Counter { count: 0 }),
//! );
//!
//! counter.call::<(), ()>("inc", ()).unwrap();
//! counter.call::<(), ()>("inc", ()).unwrap();
//! counter.call::<(), ()>("announce", ()).unwrap();
//! assert_eq!(counter.call::<(), i32>("getCount", ()), Ok(2));
//! ```

#[cfg(feature = "no_std")]
extern crate alloc;

// Module declarations
mod action;
mod broadcast;
mod component;
mod context;
mod error;
mod injectable;
mod interaction;
mod invoker;
mod lens;
mod pointer;
mod reaction;
mod resolve;
mod runtime;
mod state;
#[cfg(any(test, feature = "testing"))]
mod testing;

// Public re-exports
pub use action::{
    create_action, Action, ActionDef, ActionKind, InvokeAction, ReaderAction, ReducerAction,
    StateAction,
};
pub use broadcast::{Broadcast, Consumer, Subscription};
pub use component::{create_component, Component, Config, Init, Props};
pub use context::{Context, Subscriptions};
pub use error::Error;
pub use injectable::{create_injectable, Eval, Injectable};
pub use interaction::{create_interaction, Interaction, InteractionDef, Scope};
pub use invoker::{Actions, Command, Handler, Invoker, Payload, Reactions};
pub use lens::{Getter, Lens};
pub use pointer::{Identity, Pointer};
pub use portable_atomic_util::Arc;
pub use reaction::{create_reaction, Reaction, ReactionDef};
pub use resolve::{Binder, Resolved, ResolvedReaction};
pub use state::{create_state, State};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use testing::Recorder;
