use super::{failure_code, runtime, Context};
use crate::session_file;
use crate::OutputFormat;

pub(crate) fn run_login(ctx: &Context, email: &str, password: &str) -> i32 {
    let (store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.login(email, password)) {
        Ok(user) => {
            if let Some(session) = store.current() {
                if let Err(e) = session_file::save(&ctx.session_path, &session) {
                    eprintln!("warning: could not write session file: {}", e);
                }
            }
            print_user(ctx.output, &user.email, &user.role, "logged in as");
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

pub(crate) fn run_signup(ctx: &Context, email: &str, password: &str, role: &str) -> i32 {
    let (store, api) = ctx.api();
    let rt = runtime();
    match rt.block_on(api.signup(email, password, role)) {
        Ok(user) => {
            if let Some(session) = store.current() {
                if let Err(e) = session_file::save(&ctx.session_path, &session) {
                    eprintln!("warning: could not write session file: {}", e);
                }
            }
            print_user(ctx.output, &user.email, &user.role, "account created for");
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            failure_code(&e)
        }
    }
}

pub(crate) fn run_logout(ctx: &Context) -> i32 {
    let (store, _api) = ctx.api();
    store.clear();
    match session_file::remove(&ctx.session_path) {
        Ok(()) => {
            println!("logged out");
            0
        }
        Err(e) => {
            eprintln!("error: could not remove session file: {}", e);
            1
        }
    }
}

pub(crate) fn run_whoami(ctx: &Context, remote: bool) -> i32 {
    if remote {
        let (_store, api) = ctx.api();
        let rt = runtime();
        return match rt.block_on(api.me()) {
            Ok(user) => {
                print_user(ctx.output, &user.email, &user.role, "logged in as");
                0
            }
            Err(e) => {
                eprintln!("error: {}", e);
                failure_code(&e)
            }
        };
    }

    match session_file::load(&ctx.session_path) {
        Some(stored) => {
            print_user(ctx.output, &stored.email, &stored.role, "logged in as");
            0
        }
        None => {
            eprintln!("not logged in");
            1
        }
    }
}

fn print_user(output: OutputFormat, email: &str, role: &str, prefix: &str) {
    match output {
        OutputFormat::Text => println!("{} {} ({})", prefix, email, role),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "email": email, "role": role })
        ),
    }
}
