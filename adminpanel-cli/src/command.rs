//! Parsing of input lines.

use adminpanel_lib::validation::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn,
    Create,
    Edit(i64),
    Set(Field, String),
    Role(String),
    Roles,
    Users,
    Submit,
    Errors,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));

        let command = match word {
            "" => return Ok(None),
            "signin" => Self::SignIn,
            "create" => Self::Create,
            "edit" => {
                let id = rest
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid user id '{}'", rest.trim()))?;
                Self::Edit(id)
            }
            "set" => {
                // The value is the rest of the line, spaces included.
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::Set(field.parse()?, value.to_string())
            }
            "role" => Self::Role(rest.trim().to_string()),
            "roles" => Self::Roles,
            "users" => Self::Users,
            "submit" => Self::Submit,
            "errors" => Self::Errors,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

pub const HELP: &str = "\
commands:
  signin              open the sign-in screen
  create              open the user dialog blank
  edit <id>           open the user dialog for user <id>
  set <field> <value> type into name or password
  role <id>           select a role
  roles               list roles
  users               list users
  submit              submit the open form
  errors              show the current errors
  quit";
