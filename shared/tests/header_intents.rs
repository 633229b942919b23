use crux_core::testing::AppTester;
use pinboard_shared::capabilities::{AuthOperation, NavigateOperation};
use pinboard_shared::{
    App, AuthError, Effect, Event, Intent, Model, Profile, Session, SessionUser, UserId,
};

fn signed_in() -> Model {
    let mut model = Model::default();
    model.session = Session::signed_in(
        SessionUser::new("u1").with_avatar("https://cdn.example.com/u1.png"),
    );
    model.profile = Some(Profile::new(UserId::new("u1"), "light"));
    model
}

#[test]
fn sign_out_clears_session_on_success() {
    let app = AppTester::<App, Effect>::default();
    let mut model = signed_in();

    let update = app.update(Event::Intent(Intent::SignOut), &mut model);
    assert!(update.effects.iter().any(|e| matches!(
        e,
        Effect::Auth(request) if request.operation == AuthOperation::SignOut
    )));
    assert!(model.session.is_present(), "session stays until the provider answers");

    app.update(Event::SignOutSettled(Ok(())), &mut model);

    assert!(!model.session.is_present());
    let view = app.view(&model);
    assert!(!view.is_authenticated);
    assert!(view.show_sign_in);
    assert!(view.avatar_url.is_none());
}

#[test]
fn failed_sign_out_keeps_session_and_reports() {
    let app = AppTester::<App, Effect>::default();
    let mut model = signed_in();

    app.update(Event::Intent(Intent::SignOut), &mut model);
    app.update(
        Event::SignOutSettled(Err(AuthError::SignOutFailed {
            message: "network".into(),
        })),
        &mut model,
    );

    assert!(model.session.is_present());
    let view = app.view(&model);
    assert_eq!(view.error.map(|e| e.error_code), Some("SIGN_OUT_FAILED".to_string()));

    let update = app.update(Event::Intent(Intent::NavigateProfile), &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Navigate(_))));
}

#[test]
fn create_is_offered_only_when_signed_in() {
    let app = AppTester::<App, Effect>::default();

    assert!(!app.view(&Model::default()).show_create);

    let mut model = signed_in();
    let view = app.view(&model);
    assert!(view.show_create);
    assert_eq!(view.avatar_url.as_deref(), Some("https://cdn.example.com/u1.png"));

    let update = app.update(Event::Intent(Intent::NavigateCreate), &mut model);
    let paths: Vec<NavigateOperation> = update
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Navigate(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        paths,
        vec![NavigateOperation {
            path: "/createPin".into()
        }]
    );
}

#[test]
fn sign_in_request_opens_dialog() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::Intent(Intent::RequestSignIn), &mut model);

    assert!(model.sign_in_dialog_visible);
    assert!(app.view(&model).sign_in_dialog_visible);
    assert!(update.effects.iter().all(|e| matches!(e, Effect::Render(_))));

    app.update(Event::SignInDismissed, &mut model);
    assert!(!model.sign_in_dialog_visible);
}

#[test]
fn signing_in_closes_dialog() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::Intent(Intent::RequestSignIn), &mut model);
    app.update(
        Event::SessionLoaded(Ok(Session::signed_in(SessionUser::new("u2")))),
        &mut model,
    );

    assert!(!model.sign_in_dialog_visible);
    assert!(app.view(&model).show_sign_out);
}

#[test]
fn each_intent_produces_one_side_effect() {
    let app = AppTester::<App, Effect>::default();

    let intents = [
        Intent::SignOut,
        Intent::NavigateHome,
        Intent::NavigateCreate,
        Intent::NavigateProfile,
        Intent::ChangeTheme("dark".into()),
    ];

    for intent in intents {
        let mut model = signed_in();
        let update = app.update(Event::Intent(intent.clone()), &mut model);
        let side_effects = update
            .effects
            .iter()
            .filter(|e| !matches!(e, Effect::Render(_)))
            .count();
        assert_eq!(side_effects, 1, "{intent:?}");
    }

    let mut anonymous = Model::default();
    let update = app.update(Event::Intent(Intent::ChangeTheme("dark".into())), &mut anonymous);
    let side_effects = update
        .effects
        .iter()
        .filter(|e| !matches!(e, Effect::Render(_)))
        .count();
    assert_eq!(side_effects, 1);
}
