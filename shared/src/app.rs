use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, ProfileStore, Route, StoreError};
use crate::event::{Dispatch, Event, Intent};
use crate::model::{Model, Session, UserId};
use crate::theme::{Settlement, ThemePolicy};
use crate::view::{BrandView, HeaderView, UserFacingError};

#[derive(Default)]
pub struct App;

impl App {
    fn dispatch(intent: Intent, model: &mut Model, caps: &Capabilities) {
        match intent.resolve() {
            Dispatch::SignOut => {
                info!("sign-out requested");
                caps.auth.sign_out(Event::SignOutSettled);
            }
            Dispatch::Navigate(route) => {
                debug!(path = route.path(), "navigating");
                caps.navigate.to(route);
            }
            Dispatch::ShowSignIn => {
                model.sign_in_dialog_visible = true;
                caps.render.render();
            }
            Dispatch::ChangeTheme(theme) => Self::change_theme(theme, model, caps),
        }
    }

    fn change_theme(theme: String, model: &mut Model, caps: &Capabilities) {
        match ThemePolicy::choose(&model.session) {
            ThemePolicy::Authenticated { user_id } => {
                debug_assert!(
                    model.session.is_present(),
                    "authenticated theme change without a session"
                );

                let pending = model.theme.begin(user_id.clone(), model.profile.as_ref(), theme);
                info!(seq = pending.seq, theme = %pending.target, "theme change pending");
                caps.render.render();

                let store = ProfileStore::new(&caps.http, &model.config.profile_store);
                if let Err(error) = store.update_theme(
                    &user_id,
                    model.session.access_token(),
                    pending.seq,
                    &pending.target,
                ) {
                    warn!(seq = pending.seq, %error, "theme update could not be issued");
                    Self::settle_theme(&user_id, pending.seq, &pending.target, Err(error), model, caps);
                }
            }
            ThemePolicy::Anonymous => {
                debug!(theme = %theme, "applying theme locally");
                caps.appearance
                    .set_root_attribute(model.config.theme_attribute.clone(), theme.clone());
                model.local_theme = Some(theme);
                caps.render.render();
            }
        }
    }

    fn settle_theme(
        user_id: &UserId,
        seq: u64,
        theme: &str,
        result: Result<(), StoreError>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        if model.session.user_id() != Some(user_id) {
            debug!(seq, "theme settlement for a previous session ignored");
            return;
        }

        match model.theme.settle(&mut model.profile, user_id, seq, theme, result) {
            Settlement::Committed => {
                info!(seq, theme, "theme committed");
            }
            Settlement::RolledBack(error) => {
                warn!(seq, theme, %error, "theme change rolled back");
                model.set_error(error);
            }
            Settlement::AdvancedBase => {
                debug!(seq, theme, "older theme write landed");
            }
            Settlement::Ignored => {
                debug!(seq, "stale theme settlement ignored");
                return;
            }
        }
        caps.render.render();
    }

    fn apply_session(session: Session, model: &mut Model, caps: &Capabilities) {
        let user_changed = model.session.user_id() != session.user_id();
        model.session = session;

        if user_changed {
            model.clear_user_state();
            if let Some(user_id) = model.session.user_id().cloned() {
                info!(user = %user_id, "session started");
                model.sign_in_dialog_visible = false;
                Self::load_profile(&user_id, model, caps);
            } else {
                info!("session ended");
            }
        }

        caps.render.render();
    }

    fn load_profile(user_id: &UserId, model: &mut Model, caps: &Capabilities) {
        let store = ProfileStore::new(&caps.http, &model.config.profile_store);
        let as_of = model.theme.last_issued();
        if let Err(error) = store.read_profile(user_id, model.session.access_token(), as_of) {
            warn!(%error, "profile read could not be issued");
            model.set_error(error);
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = HeaderView;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            "header event"
        );

        match event {
            Event::Started(config) => {
                debug!(?config, "header started");
                model.config = config;
                caps.auth.get_session(Event::SessionLoaded);
                caps.catalog.list_themes(Event::ThemesLoaded);
                caps.render.render();
            }

            Event::SessionLoaded(Ok(session)) | Event::SessionChanged(session) => {
                Self::apply_session(session, model, caps);
            }

            Event::SessionLoaded(Err(error)) => {
                warn!(%error, "session lookup failed");
                model.set_error(error);
                caps.render.render();
            }

            Event::ThemesLoaded(themes) => {
                debug!(count = themes.len(), "theme catalog loaded");
                model.themes = themes;
                caps.render.render();
            }

            Event::ProfileLoaded {
                user_id,
                as_of,
                result,
            } => {
                if model.session.user_id() != Some(&user_id) {
                    debug!(user = %user_id, "profile for a previous session ignored");
                    return;
                }
                match result {
                    Ok(Some(profile)) => {
                        debug!(as_of, theme = %profile.theme, "profile loaded");
                        model.theme.load(&mut model.profile, Some(profile), as_of);
                    }
                    Ok(None) => {
                        warn!(user = %user_id, "no profile row for user");
                        model.theme.load(&mut model.profile, None, as_of);
                    }
                    Err(error) => {
                        warn!(%error, "profile read failed");
                        model.set_error(error);
                    }
                }
                caps.render.render();
            }

            Event::Intent(intent) => Self::dispatch(intent, model, caps),

            Event::ThemePersisted {
                user_id,
                seq,
                theme,
                result,
            } => Self::settle_theme(&user_id, seq, &theme, result, model, caps),

            Event::SignOutSettled(Ok(())) => {
                info!("signed out");
                model.session = Session::absent();
                model.clear_user_state();
                caps.render.render();
            }

            Event::SignOutSettled(Err(error)) => {
                warn!(%error, "sign-out failed");
                model.set_error(error);
                caps.render.render();
            }

            Event::SignInDismissed => {
                model.sign_in_dialog_visible = false;
                caps.render.render();
            }

            Event::ErrorDismissed => {
                model.clear_error();
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> HeaderView {
        let authenticated = model.is_authenticated();

        HeaderView {
            brand: BrandView::new(&model.config.brand.title, &model.config.brand.logo_url),
            is_authenticated: authenticated,
            show_create: authenticated,
            show_sign_in: !authenticated,
            show_sign_out: authenticated,
            themes: model.themes.clone(),
            active_theme: model.active_theme().map(str::to_owned),
            theme_sync: model.theme.sync.status(),
            avatar_url: model.session.avatar_url().map(str::to_owned),
            profile_path: Route::Profile.path().to_owned(),
            sign_in_dialog_visible: model.sign_in_dialog_visible,
            error: model.active_error.as_ref().map(UserFacingError::from),
        }
    }
}
