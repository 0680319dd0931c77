use std::io::Write;

use conduit_core::actions;
use conduit_core::api::Transport;
use conduit_core::persist::KeyValueStorage;
use conduit_core::validation::{SignInForm, SignUpForm};

use crate::app::App;
use crate::error::CliError;

pub async fn run_login<S, T>(
    app: &mut App<S, T>,
    email: String,
    password: String,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let credentials = SignInForm { email, password }.validate()?;
    if !actions::login(&mut app.store, &app.api, &app.storage, &credentials).await {
        return Err(app.user_error());
    }

    let username = app.state().user.username().unwrap_or_default();
    writeln!(out, "Signed in as {username}")?;
    Ok(())
}

pub async fn run_register<S, T>(
    app: &mut App<S, T>,
    form: SignUpForm,
    out: &mut impl Write,
) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let registration = form.validate()?;
    if !actions::register(&mut app.store, &app.api, &registration).await {
        return Err(app.user_error());
    }

    writeln!(out, "Registered and signed in as {}", registration.username)?;
    Ok(())
}

pub fn run_logout<S, T>(app: &mut App<S, T>, out: &mut impl Write) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    let was_signed_in = app.state().user.is_authenticated();
    actions::logout(&mut app.store, &app.storage);

    if was_signed_in {
        writeln!(out, "Signed out")?;
    } else {
        writeln!(out, "Not signed in")?;
    }
    Ok(())
}

pub fn run_whoami<S, T>(app: &App<S, T>, out: &mut impl Write) -> Result<(), CliError>
where
    S: KeyValueStorage,
    T: Transport,
{
    match app.require_user() {
        Ok(user) => {
            writeln!(out, "{} <{}>", user.username, user.email)?;
            if let Some(bio) = user.bio.as_deref() {
                writeln!(out, "{bio}")?;
            }
            if let Some(image) = user.image.as_deref() {
                writeln!(out, "avatar: {image}")?;
            }
        }
        Err(CliError::NotSignedIn) => writeln!(out, "Not signed in")?,
        Err(error) => return Err(error),
    }
    Ok(())
}
