use super::{count_getter, count_lens, count_of, counter_config, given_a_counter};
use super::given_an_observable_counter;
use super::{status_getter, status_lens, Counter, CounterAction, Status};
use statelet::{
    create_action, create_component, create_interaction, Action, Command, Component, Config,
    Error, Eval, Init, InteractionDef, InvokeAction, ReaderAction, ReducerAction, Resolved,
    Scope, StateAction,
};
use statelet::Arc;

fn given_a_reducing_counter(count: i32) -> Component<Counter> {
    create_component(
        counter_config().action(
            "dispatch",
            create_action(ReducerAction::lensed(
                count_lens(),
                |count: i32, action: CounterAction| match action {
                    CounterAction::Increment => count + 1,
                    CounterAction::Decrement => (count - 1).max(0),
                },
            )),
        ),
        Init::new(Counter { count }),
    )
}

#[test]
fn given_a_reducer_when_decrementing_zero_should_clamp_at_zero() {
    let component = given_a_reducing_counter(0);

    component
        .call::<CounterAction, ()>("dispatch", CounterAction::Decrement)
        .unwrap();

    assert_eq!(count_of(&component), 0);
}

#[test]
fn given_a_reducer_when_dispatching_a_sequence_should_fold_every_action() {
    let component = given_a_reducing_counter(0);

    for action in [
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Decrement,
        CounterAction::Decrement,
        CounterAction::Decrement,
        CounterAction::Increment,
    ] {
        component
            .call::<CounterAction, ()>("dispatch", action)
            .unwrap();
    }

    assert_eq!(count_of(&component), 1);
}

#[test]
fn given_an_unlensed_state_action_should_see_the_whole_state() {
    let component = create_component(
        Config::new().action(
            "add",
            create_action(StateAction::new(|state: Arc<Counter>, amount: i32| {
                let count = state.count + amount;
                (count, Arc::new(Counter { count }))
            })),
        ),
        Init::new(Counter { count: 2 }),
    );

    assert_eq!(component.call::<i32, i32>("add", 5), Ok(7));
    assert_eq!(component.render().map(|props| props.state.count), Ok(7));
}

#[test]
fn given_a_reader_should_leave_state_untouched() {
    let component = given_a_counter(5);
    let before = component.render().unwrap().state;

    assert_eq!(count_of(&component), 5);

    let after = component.render().unwrap().state;
    assert!(Arc::ptr_eq(&before, &after));
}

fn given_a_status_component(status: &str) -> Component<Status> {
    create_component(
        Config::new()
            .action(
                "append",
                create_action(StateAction::lensed(status_lens(), |status: String, suffix: String| {
                    ((), status + &suffix)
                })),
            )
            .action(
                "getStatus",
                create_action(ReaderAction::lensed(status_getter(), |status: String, _: ()| {
                    status
                })),
            ),
        Init::new(Status {
            status: status.to_string(),
        }),
    )
}

#[test]
fn given_an_interaction_on_a_sibling_when_invoked_through_the_queue_should_mutate_it_once() {
    let sibling = given_a_status_component("idle");
    let component = create_component(
        Config::new()
            .action(
                "touch",
                create_action(InvokeAction::new(|_: Arc<Counter>, _: ()| {
                    ((), vec![Command::new("appendToSibling", " changed".to_string())])
                })),
            )
            .interaction(
                "appendToSibling",
                create_interaction(InteractionDef::new(
                    |scope: Scope<Arc<Counter>, Arc<Component<Status>>>, suffix: String| {
                        scope.dependencies.call::<String, ()>("append", suffix)
                    },
                )),
            ),
        Init::new(Counter { count: 0 }).dependencies(sibling.clone()),
    );

    component.call::<(), ()>("touch", ()).unwrap();
    assert_eq!(
        sibling.call::<(), String>("getStatus", ()),
        Ok("idle changed".to_string())
    );

    component.call::<(), ()>("touch", ()).unwrap();
    assert_eq!(
        sibling.call::<(), String>("getStatus", ()),
        Ok("idle changed changed".to_string())
    );
}

#[test]
fn given_a_lensed_interaction_should_see_only_its_views() {
    let sibling = given_a_status_component("ready");
    let component = create_component(
        Config::new().interaction(
            "describe",
            create_interaction(InteractionDef::lensed(
                count_getter(),
                statelet::Getter::new(|sibling: &Component<Status>| {
                    sibling.call::<(), String>("getStatus", ())
                }),
                |scope: Scope<i32, Result<String, Error>>, prefix: &'static str| {
                    scope
                        .dependencies
                        .map(|status| format!("{prefix}{}:{status}", scope.state))
                },
            )),
        ),
        Init::new(Counter { count: 7 }).dependencies(sibling),
    );

    assert_eq!(
        component.call::<&'static str, Result<String, Error>>("describe", "#"),
        Ok(Ok("#7:ready".to_string()))
    );
}

#[test]
fn given_an_interaction_named_like_an_action_should_shadow_it() {
    let component = create_component(
        counter_config()
            .action(
                "greet",
                create_action(ReaderAction::new(|_: Arc<Counter>, _: ()| "action")),
            )
            .interaction(
                "greet",
                create_interaction(InteractionDef::new(|_: Scope<Arc<Counter>, Arc<()>>, _: ()| {
                    "interaction"
                })),
            ),
        Init::new(Counter { count: 0 }),
    );

    assert_eq!(
        component.call::<(), &'static str>("greet", ()),
        Ok("interaction")
    );
}

#[test]
fn given_an_action_returning_another_action_should_hand_back_a_bound_callable() {
    let inc: Action<Counter, (), (), i32> = create_action(StateAction::lensed(
        count_lens(),
        |count: i32, _: ()| (count + 1, count + 1),
    ));
    let component = create_component(
        counter_config().action("incHandle", Action::new(move |_: ()| Eval::resolve(inc.clone()))),
        Init::new(Counter { count: 0 }),
    );

    let handle = component
        .call::<(), Resolved<Counter, (), (), i32>>("incHandle", ())
        .unwrap();
    assert_eq!(count_of(&component), 0);

    assert_eq!(handle.call(()), Ok(1));
    assert_eq!(handle.call(()), Ok(2));
    assert_eq!(count_of(&component), 2);

    component.dispose();
    assert_eq!(handle.call(()), Err(Error::Disposed));
}

#[test]
fn given_an_unregistered_name_should_fail_with_unknown_command() {
    let component = given_a_counter(0);

    assert_eq!(
        component.call::<(), ()>("nope", ()),
        Err(Error::UnknownCommand("nope".to_string()))
    );
}

#[test]
fn given_mismatched_payload_or_output_types_should_name_the_action() {
    let component = given_a_counter(0);

    assert_eq!(
        component.call::<&str, i32>("inc", "one"),
        Err(Error::PayloadType("inc".to_string()))
    );
    assert_eq!(
        component.call::<(), String>("getCount", ()),
        Err(Error::OutputType("getCount".to_string()))
    );
    assert_eq!(count_of(&component), 0);
}

#[test]
fn given_a_state_action_called_for_the_wrong_output_should_not_run_it() {
    let (component, recorder) = given_an_observable_counter(0);

    assert_eq!(
        component.call::<(), String>("inc", ()),
        Err(Error::OutputType("inc".to_string()))
    );
    assert_eq!(
        component.call::<i32, i32>("inc", 1),
        Err(Error::PayloadType("inc".to_string()))
    );

    assert_eq!(count_of(&component), 0);
    assert_eq!(recorder.count(), 0);
}

#[test]
fn given_an_interaction_lensing_only_state_should_see_whole_dependencies() {
    let sibling = given_a_status_component("ready");
    let component = create_component(
        Config::new().interaction(
            "describe",
            create_interaction(InteractionDef::state_lensed(
                count_getter(),
                |scope: Scope<i32, Arc<Component<Status>>>, _: ()| {
                    scope
                        .dependencies
                        .call::<(), String>("getStatus", ())
                        .map(|status| format!("{}:{status}", scope.state))
                },
            )),
        ),
        Init::new(Counter { count: 3 }).dependencies(sibling),
    );

    assert_eq!(
        component.call::<(), Result<String, Error>>("describe", ()),
        Ok(Ok("3:ready".to_string()))
    );
}

#[test]
fn given_an_interaction_lensing_only_dependencies_should_see_whole_state() {
    let component = create_component(
        Config::new().interaction(
            "describe",
            create_interaction(InteractionDef::dependencies_lensed(
                statelet::Getter::new(|label: &&'static str| label.len()),
                |scope: Scope<Arc<Counter>, usize>, _: ()| scope.state.count + scope.dependencies as i32,
            )),
        ),
        Init::new(Counter { count: 3 }).dependencies("four"),
    );

    assert_eq!(component.call::<(), i32>("describe", ()), Ok(7));
}
