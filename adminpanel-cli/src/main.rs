mod command;
mod config;

use std::fs::File;
use std::sync::Arc;

use adminpanel_lib::PanelClient;
use adminpanel_lib::check::RemoteUniquenessChecker;
use adminpanel_lib::forms::{SignInForm, UserForm};
use adminpanel_lib::notify::{ChannelNotifier, Notice, Notifier};
use adminpanel_lib::session::{FormValidationSession, SessionConfig};
use adminpanel_lib::validation::{ErrorMap, Field};
use simplelog::{Config, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::command::{Command, HELP};
use crate::config::CliConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Closed,
    SignIn,
    User,
}

struct App {
    client: PanelClient,
    notifier: Arc<ChannelNotifier>,
    screen: Screen,
    sign_in: Option<SignInForm>,
    user: Option<UserForm>,
}

impl App {
    fn session(&self) -> Option<&FormValidationSession> {
        match self.screen {
            Screen::Closed => None,
            Screen::SignIn => self.sign_in.as_ref().map(SignInForm::session),
            Screen::User => self.user.as_ref().map(UserForm::session),
        }
    }

    fn open_sign_in(&mut self) {
        let session = FormValidationSession::builder(SessionConfig::sign_in())
            .notifier(self.notifier.clone())
            .build();
        watch_errors(session.subscribe_errors());
        let form = SignInForm::new(session, Arc::new(self.client.clone()), self.notifier.clone());
        self.sign_in = Some(form);
        self.screen = Screen::SignIn;
        println!("sign-in: set name, set password, then submit");
    }

    /// The user dialog, created on first use.
    fn user_form(&mut self) -> &mut UserForm {
        self.screen = Screen::User;
        let (client, notifier) = (&self.client, &self.notifier);
        self.user.get_or_insert_with(|| {
            let session = FormValidationSession::builder(SessionConfig::user_form())
                .checker(Arc::new(RemoteUniquenessChecker::new(client.clone())))
                .notifier(notifier.clone())
                .build();
            watch_errors(session.subscribe_errors());
            UserForm::new(session, Arc::new(client.clone()), notifier.clone())
        })
    }

    async fn handle(&mut self, command: Command) -> Result<bool, adminpanel_lib::error::Error> {
        match command {
            Command::SignIn => self.open_sign_in(),
            Command::Create => {
                self.user_form().open_create();
                println!("new user: set name, set password, role <id>, then submit");
            }
            Command::Edit(id) => {
                let users = self.client.fetch_users().await?;
                match users.iter().find(|u| u.id == id) {
                    Some(user) => {
                        self.user_form().open_edit(user);
                        println!("editing {} ({})", user.name, user.id);
                    }
                    None => println!("no user with id {id}"),
                }
            }
            Command::Set(field, value) => match self.session() {
                Some(session) => session.on_field_change(field, value),
                None => println!("no form open"),
            },
            Command::Role(id) => match self.session() {
                Some(session) => session.on_select_change(Field::Role, id),
                None => println!("no form open"),
            },
            Command::Roles => {
                for role in self.client.fetch_roles().await? {
                    println!("  {:>4}  {}", role.id, role.name);
                }
            }
            Command::Users => {
                for user in self.client.fetch_users().await? {
                    let state = if user.active { "active" } else { "inactive" };
                    println!("  {:>4}  {:<30} {state}", user.id, user.name);
                }
            }
            Command::Submit => self.submit().await,
            Command::Errors => match self.session() {
                Some(session) => print_errors(&session.errors()),
                None => println!("no form open"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Failures have already been toasted; they only go to the log here.
    async fn submit(&mut self) {
        match self.screen {
            Screen::SignIn => {
                let Some(form) = &self.sign_in else {
                    return;
                };
                match form.submit().await {
                    Ok(outcome) => {
                        log::info!("[cli] signed in as {}", outcome.user.name);
                        self.client = self.client.with_token(outcome.token);
                        self.sign_in = None;
                        self.screen = Screen::Closed;
                    }
                    Err(e) => log::debug!("[cli] sign-in failed: {e}"),
                }
            }
            Screen::User => {
                if let Some(form) = &mut self.user {
                    if let Err(e) = form.save().await {
                        log::debug!("[cli] save failed: {e}");
                    }
                }
            }
            Screen::Closed => println!("no form open"),
        }
    }
}

fn print_errors(errors: &ErrorMap) {
    if errors.is_empty() {
        println!("  (no errors)");
    }
    let mut entries: Vec<_> = errors.iter().collect();
    entries.sort();
    for (field, message) in entries {
        println!("  {field}: {message}");
    }
}

fn watch_errors(mut rx: watch::Receiver<ErrorMap>) {
    tokio::spawn(async move {
        // Ends when the session is dropped.
        while rx.changed().await.is_ok() {
            let errors = rx.borrow_and_update().clone();
            print_errors(&errors);
        }
    });
}

fn print_notices(mut rx: tokio::sync::mpsc::UnboundedReceiver<Notice>) {
    tokio::spawn(async move {
        while let Some(notice) = rx.recv().await {
            match notice {
                Notice::Toast(toast) => println!("[{:?}] {}", toast.level, toast.message),
                Notice::Error { context, message } => {
                    println!("[warning] {context}: {message}")
                }
            }
        }
    });
}

#[tokio::main]
async fn main() {
    let config = CliConfig::from_env();

    let log_file = File::create(&config.log_file).expect("Failed to create log file");
    WriteLogger::init(config.log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let client = match PanelClient::builder().url(&config.base_url).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };
    log::info!("[cli] using backend {}", client.base_url());

    let (notifier, notices) = ChannelNotifier::new();
    print_notices(notices);

    let mut app = App {
        client,
        notifier: Arc::new(notifier),
        screen: Screen::Closed,
        sign_in: None,
        user: None,
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match app.handle(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                log::error!("[cli] {e}");
                app.notifier.report_error("running command", &e);
            }
        }
    }
}
