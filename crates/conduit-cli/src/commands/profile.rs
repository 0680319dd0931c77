use std::io::Write;

use conduit_core::actions;
use conduit_core::api::Transport;
use conduit_core::persist::KeyValueStorage;
use conduit_core::validation::ProfileForm;

use crate::app::App;
use crate::error::CliError;

/// Flags for `conduit profile`; omitted fields keep their current value.
#[derive(Debug, Default)]
pub struct ProfileEdits {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
    pub image: Option<String>,
}

pub async fn run_profile<S, T>(
    app: &mut App<S, T>,
    edits: ProfileEdits,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let user = app.require_user()?;
    let token = user.token.clone();
    let form = ProfileForm {
        username: edits.username.unwrap_or_else(|| user.username.clone()),
        email: edits.email.unwrap_or_else(|| user.email.clone()),
        bio: edits.bio.or_else(|| user.bio.clone()),
        password: edits.password.unwrap_or_default(),
        avatar: edits
            .image
            .or_else(|| user.image.clone())
            .unwrap_or_default(),
    };
    let update = form.validate()?;

    if !actions::update_profile(&mut app.store, &app.api, &update, Some(&token)).await {
        return Err(app.user_error());
    }

    let username = app.state().user.username().unwrap_or_default();
    writeln!(out, "Profile updated for {username}")?;
    Ok(())
}
