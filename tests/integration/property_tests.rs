use std::cell::Cell;
use std::rc::Rc;

use super::{given_an_observable_counter, Counter};
use proptest::prelude::*;
use statelet::{
    create_action, create_component, create_interaction, Arc, Command, Component, Config, Init,
    InteractionDef, InvokeAction, Scope,
};

type Ticks = Rc<Cell<usize>>;

fn given_a_ticking_component(ticks: Ticks) -> Component<Counter, Ticks> {
    create_component(
        Config::new()
            .action(
                "queue",
                create_action(InvokeAction::new(|_: Arc<Counter>, k: usize| {
                    ((), (0..k).map(|_| Command::new("tick", ())).collect())
                })),
            )
            .interaction(
                "tick",
                create_interaction(InteractionDef::new(
                    |scope: Scope<Arc<Counter>, Arc<Ticks>>, _: ()| {
                        scope.dependencies.set(scope.dependencies.get() + 1)
                    },
                )),
            ),
        Init::new(Counter { count: 0 }).dependencies(ticks),
    )
}

proptest! {
    #[test]
    fn given_k_queued_commands_should_dispatch_exactly_k_times(k in 0usize..64) {
        let ticks = Rc::new(Cell::new(0));
        let component = given_a_ticking_component(ticks.clone());

        component.call::<usize, ()>("queue", k).unwrap();
        prop_assert_eq!(ticks.get(), k);

        // The queue is empty again: queuing nothing adds nothing.
        component.call::<usize, ()>("queue", 0).unwrap();
        prop_assert_eq!(ticks.get(), k);
    }

    #[test]
    fn given_n_changing_calls_should_notify_exactly_n_times(n in 0usize..32) {
        let (component, recorder) = given_an_observable_counter(0);

        for _ in 0..n {
            component.call::<(), i32>("inc", ()).unwrap();
        }

        prop_assert_eq!(recorder.count(), n);
        prop_assert_eq!(recorder.last().map(|state| state.count as usize).unwrap_or(0), n);
    }
}
