//! Interactive registration session.
//!
//! A line-oriented loop: each line is parsed into a [`SessionCommand`],
//! turned into an [`Action`], dispatched to the [`App`], and the resulting
//! [`View`] is written back. The `new` command walks the operator through
//! the form one field at a time.
//!
//! Command lines are split like a shell would, so quoted words keep their
//! spaces: `list --role "Product Manager"`.

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::app::{Action, App, ListFilter, View};
use crate::collaborator::CollaboratorForm;
use crate::config::FormConfig;
use crate::error::Result;

/// Prompt shown before every command.
const PROMPT: &str = "roster> ";

/// A command typed at the session prompt.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct SessionLine {
    /// The command to execute
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands available inside the session.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum SessionCommand {
    /// Register a new collaborator
    New,

    /// List collaborators
    List(ListArgs),

    /// Delete a collaborator
    Delete {
        /// Id of the collaborator to delete
        id: i64,
    },

    /// Show statistics
    Stats,

    /// Show information about the system
    About,

    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// List command arguments.
#[derive(Debug, Args, PartialEq, Eq)]
pub struct ListArgs {
    /// Show only collaborators with this role
    #[arg(short, long)]
    pub role: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Show only collaborators whose name contains this text
    pub name: Vec<String>,
}

impl ListArgs {
    /// Build the filter these arguments describe.
    #[must_use]
    pub fn filter(&self) -> ListFilter {
        let name = (!self.name.is_empty()).then(|| self.name.join(" "));
        ListFilter::new(name, self.role.clone())
    }
}

/// Whether the loop should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// An interactive session over any line input and text output.
#[derive(Debug)]
pub struct Session<R, W> {
    app: App,
    form: FormConfig,
    input: R,
    output: W,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a session reading commands from `input`.
    pub fn new(app: App, form: FormConfig, input: R, output: W) -> Self {
        Self {
            app,
            form,
            input,
            output,
        }
    }

    /// Consume the session, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `quit` or the end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run(&mut self) -> Result<()> {
        let banner = View::About(self.app.content().to_string()).to_string();
        self.write(&banner).await?;
        self.write("Type `help` for the list of commands.\n").await?;

        loop {
            self.write(PROMPT).await?;
            let Some(line) = self.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some(words) = shlex::split(line) else {
                self.write("error: unbalanced quotes\n").await?;
                continue;
            };
            match SessionLine::try_parse_from(words) {
                Ok(parsed) => {
                    debug!("Dispatching {:?}", parsed.command);
                    if self.dispatch(parsed.command).await? == Flow::Quit {
                        break;
                    }
                }
                Err(e) => self.write(&e.to_string()).await?,
            }
        }

        self.write("Bye.\n").await
    }

    async fn dispatch(&mut self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::New => return self.new_collaborator().await,
            SessionCommand::List(args) => {
                let view = self.app.handle(Action::List(args.filter()));
                match view {
                    View::Listing(listing) if args.json => {
                        let json = serde_json::to_string_pretty(&listing.rows)?;
                        self.write(&format!("{json}\n")).await?;
                    }
                    view => self.show(&view).await?,
                }
            }
            SessionCommand::Delete { id } => return self.delete(id).await,
            SessionCommand::Stats => {
                let view = self.app.handle(Action::Statistics);
                self.show(&view).await?;
            }
            SessionCommand::About => {
                let view = self.app.handle(Action::About);
                self.show(&view).await?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn new_collaborator(&mut self) -> Result<Flow> {
        let Some(form) = self.read_form().await? else {
            return Ok(Flow::Quit);
        };
        let view = self.app.handle(Action::Submit(form));
        self.show(&view).await?;
        Ok(Flow::Continue)
    }

    /// Ask for every form field; `None` if input ends first.
    async fn read_form(&mut self) -> Result<Option<CollaboratorForm>> {
        let states = self.form.states.clone();
        let roles = self.form.roles.clone();
        let mut form = CollaboratorForm::default();

        let Some(full_name) = self.prompt("Full name *").await? else {
            return Ok(None);
        };
        form.full_name = full_name;
        let Some(city) = self.prompt("City").await? else {
            return Ok(None);
        };
        form.city = city;
        let Some(phone) = self.prompt("Phone, e.g. (11) 99999-9999").await? else {
            return Ok(None);
        };
        form.phone = phone;
        let Some(address) = self.prompt("Address").await? else {
            return Ok(None);
        };
        form.address = address;
        let Some(state_code) = self.prompt_choice("State", &states).await? else {
            return Ok(None);
        };
        form.state_code = state_code;
        let Some(birth_date) = self.prompt("Birth date (YYYY-MM-DD)").await? else {
            return Ok(None);
        };
        form.birth_date = birth_date;
        let Some(district) = self.prompt("District").await? else {
            return Ok(None);
        };
        form.district = district;
        let Some(postal_code) = self.prompt("Postal code, e.g. 12345-678").await? else {
            return Ok(None);
        };
        form.postal_code = postal_code;
        let Some(role) = self.prompt_choice("Role", &roles).await? else {
            return Ok(None);
        };
        form.role = role;

        Ok(Some(form))
    }

    async fn delete(&mut self, id: i64) -> Result<Flow> {
        let question = match self.app.find(id) {
            Some(collaborator) => format!("Delete {id} - {}? [y/N]", collaborator.full_name),
            None => format!("Delete collaborator {id}? [y/N]"),
        };

        let Some(answer) = self.prompt(&question).await? else {
            return Ok(Flow::Quit);
        };
        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            let view = self.app.handle(Action::Delete(id));
            self.show(&view).await?;
        } else {
            self.write("Deletion cancelled.\n").await?;
        }
        Ok(Flow::Continue)
    }

    /// Read one answer; `None` if input ended.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.write(&format!("{label}: ")).await?;
        self.next_line().await
    }

    /// Read one line without its terminator; `None` at end of input.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than ending the
    /// session.
    async fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf);
        if matches!(line, std::borrow::Cow::Owned(_)) {
            warn!("Replaced invalid UTF-8 in input line");
        }
        Ok(Some(line.into_owned()))
    }

    /// Read an answer that must be blank or one of `options`.
    ///
    /// Matching ignores case; the option's own spelling is returned.
    async fn prompt_choice(&mut self, label: &str, options: &[String]) -> Result<Option<String>> {
        let question = format!("{label} [{}]", options.join(", "));
        loop {
            let Some(answer) = self.prompt(&question).await? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Some(String::new()));
            }
            if let Some(option) = options.iter().find(|o| o.to_lowercase() == answer.to_lowercase())
            {
                return Ok(Some(option.clone()));
            }
            self.write("Please pick one of the listed options or leave it blank.\n")
                .await?;
        }
    }

    async fn show(&mut self, view: &View) -> Result<()> {
        self.write(&view.to_string()).await
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}
