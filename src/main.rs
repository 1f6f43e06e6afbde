use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use people_sync::{
    logging, DeleteGate, FieldErrors, FormController, FormInput, HttpRemoteCollection,
    ListController, Person, PersonId, Settings, SubmitError, TransportError, SAVE_FAILED_MESSAGE,
};

#[derive(Debug, Parser)]
#[command(name = "people-sync", about = "Manage person records on a REST collection")]
struct Cli {
    /// TOML settings file (defaults to ./people-sync.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `remote.base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show people, optionally filtered by name or email.
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Add a person.
    Add(FieldArgs),
    /// Change fields of an existing person.
    Update {
        #[arg(long)]
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a person after confirmation.
    Delete {
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    middle_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Date of birth, YYYY-MM-DD.
    #[arg(long)]
    dob: Option<String>,
    /// `--male` alone means true; `--male false` clears it on update.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    male: Option<bool>,
}

impl FieldArgs {
    fn into_inputs(self) -> Vec<FormInput> {
        let mut inputs = Vec::new();
        if let Some(v) = self.first_name {
            inputs.push(FormInput::FirstName(v));
        }
        if let Some(v) = self.middle_name {
            inputs.push(FormInput::MiddleName(v));
        }
        if let Some(v) = self.last_name {
            inputs.push(FormInput::LastName(v));
        }
        if let Some(v) = self.email {
            inputs.push(FormInput::Email(v));
        }
        if let Some(v) = self.description {
            inputs.push(FormInput::Description(v));
        }
        if let Some(v) = self.dob {
            inputs.push(FormInput::Dob(v));
        }
        if let Some(v) = self.male {
            inputs.push(FormInput::IsMale(v));
        }
        inputs
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(base_url) = cli.base_url {
        settings.remote.base_url = base_url;
    }

    if let Err(e) = logging::init(&settings.logging.level) {
        eprintln!("logging disabled: {e}");
    }
    tracing::debug!(endpoint = %settings.remote.endpoint(), "settings loaded");

    let remote = HttpRemoteCollection::from_settings(&settings.remote)
        .context("building HTTP client")?;
    let mut list = ListController::new(remote).with_timeout(settings.remote.timeout());

    if let Err(err) = list.initialize().await {
        println!("{}", empty_state(&err));
        return Ok(ExitCode::FAILURE);
    }

    match cli.command {
        Command::List { query } => {
            if let Some(query) = query {
                list.set_query(query);
            }
            print_people(&list.visible());
            Ok(ExitCode::SUCCESS)
        }
        Command::Add(fields) => {
            let mut form = FormController::new();
            form.open_create();
            save(&mut form, &mut list, fields).await
        }
        Command::Update { id, fields } => {
            let id = PersonId::parse(&id);
            let Some(person) = list.get(&id).cloned() else {
                println!("No person with id {id}.");
                return Ok(ExitCode::FAILURE);
            };
            let mut form = FormController::new();
            form.open_update(&person);
            save(&mut form, &mut list, fields).await
        }
        Command::Delete { id, yes } => {
            let id = PersonId::parse(&id);
            let mut gate = DeleteGate::new();
            gate.request(id.clone());

            if !yes && !confirm(&format!("Delete person {id}? [y/N] ")).await? {
                gate.cancel();
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }

            match gate.confirm(&mut list).await {
                Ok(deleted) => {
                    println!("Deleted person {deleted}.");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    println!("Could not delete person {id}: {err}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

async fn save(
    form: &mut FormController,
    list: &mut ListController<HttpRemoteCollection>,
    fields: FieldArgs,
) -> anyhow::Result<ExitCode> {
    for input in fields.into_inputs() {
        form.apply(input);
    }

    match form.submit(list).await {
        Ok(person) => {
            println!("Saved:");
            print_people(&[&person]);
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Invalid(errors)) => {
            for line in invalid_field_lines(&errors) {
                println!("{line}");
            }
            Ok(ExitCode::FAILURE)
        }
        Err(SubmitError::Transport(err)) => {
            println!("{SAVE_FAILED_MESSAGE}: {err}");
            Ok(ExitCode::FAILURE)
        }
        Err(SubmitError::NotEditing) => anyhow::bail!("form was not open"),
    }
}

async fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn empty_state(err: &TransportError) -> String {
    format!(
        "No people to show: the list could not be loaded ({err}).\n\
         Check the server and run the command again to retry."
    )
}

fn invalid_field_lines(errors: &FieldErrors) -> Vec<String> {
    errors
        .iter()
        .map(|(field, message)| format!("  --{}: {}", flag_name(field.as_str()), message))
        .collect()
}

/// `firstName` -> `first-name`
fn flag_name(field: &str) -> String {
    let mut flag = String::new();
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            flag.push('-');
            flag.push(c.to_ascii_lowercase());
        } else {
            flag.push(c);
        }
    }
    flag
}

fn print_people(people: &[&Person]) {
    if people.is_empty() {
        println!("(no people)");
        return;
    }
    println!(
        "{:<8} {:<16} {:<16} {:<28} {:<12}",
        "ID", "FIRST NAME", "LAST NAME", "EMAIL", "BORN"
    );
    for person in people {
        let born = person
            .birth_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| person.details.dob.clone());
        println!(
            "{:<8} {:<16} {:<16} {:<28} {:<12}",
            person.id.to_string(),
            person.details.first_name,
            person.details.last_name,
            person.details.email,
            born
        );
    }
}
