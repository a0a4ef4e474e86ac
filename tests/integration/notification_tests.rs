use super::{count_of, counter_config, given_an_observable_counter, Counter};
use statelet::{
    create_action, create_component, Action, Arc, Context, Eval, Init, Recorder, StateAction,
};

#[test]
fn given_an_action_returning_the_same_state_should_not_notify() {
    let component = create_component(
        counter_config()
            .action(
                "noop",
                create_action(StateAction::new(|state: Arc<Counter>, _: ()| ((), state))),
            )
            .observable(),
        Init::new(Counter { count: 0 }),
    );
    let recorder = Recorder::<Arc<Counter>>::new();
    component.subscribe(recorder.consumer());
    let before = component.render().unwrap().state;

    component.call::<(), ()>("noop", ()).unwrap();
    component.call::<(), ()>("noop", ()).unwrap();

    assert_eq!(recorder.count(), 0);
    assert!(Arc::ptr_eq(&before, &component.render().unwrap().state));
}

#[test]
fn given_an_observable_counter_when_incremented_should_notify_with_new_state() {
    let (component, recorder) = given_an_observable_counter(0);

    component.call::<(), i32>("inc", ()).unwrap();

    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.last().map(|state| state.count), Some(1));
    assert_eq!(count_of(&component), 1);
}

#[test]
fn given_a_run_changing_state_twice_should_notify_once_with_the_final_state() {
    let double = Action::new(|_: ()| {
        Eval::inject(|ctx: Context<Counter, ()>| {
            let first = Arc::new(Counter {
                count: ctx.state.count + 1,
            });
            let ctx = ctx.with_state(first);
            (
                Eval::inject(|ctx: Context<Counter, ()>| {
                    let second = Arc::new(Counter {
                        count: ctx.state.count + 1,
                    });
                    (Eval::Value(()), ctx.with_state(second))
                }),
                ctx,
            )
        })
    });
    let component = create_component(
        counter_config().action("double", double).observable(),
        Init::new(Counter { count: 0 }),
    );
    let recorder = Recorder::<Arc<Counter>>::new();
    component.subscribe(recorder.consumer());

    component.call::<(), ()>("double", ()).unwrap();

    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.last().map(|state| state.count), Some(2));
}

#[test]
fn given_an_unsubscribed_thunk_should_stop_notifying() {
    let (component, _) = given_an_observable_counter(0);
    let recorder = Recorder::<Arc<Counter>>::new();
    let subscription = component
        .subscribe(recorder.consumer())
        .expect("component is observable");

    component.call::<(), i32>("inc", ()).unwrap();
    subscription.unsubscribe();
    component.call::<(), i32>("inc", ()).unwrap();

    assert_eq!(recorder.count(), 1);
}

#[test]
fn given_a_disposed_observable_component_should_drop_its_observers() {
    let (component, recorder) = given_an_observable_counter(0);

    component.call::<(), i32>("inc", ()).unwrap();
    component.dispose();

    assert!(component.call::<(), i32>("inc", ()).is_err());
    assert_eq!(recorder.count(), 1);
}
