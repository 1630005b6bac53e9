//! `apptbook` - CLI for the appointment book
//!
//! This binary provides the command-line interface for listing, creating,
//! editing and deleting appointments.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use apptbook::cli::{
    render_form, Cli, Command, ConfigCommand, OutputFormat, PromptConfirm,
};
use apptbook::listing::AutoConfirm;
use apptbook::{
    init_logging, App, Config, Confirm, DeleteOutcome, Error, FormMode, FormView, Listing,
    PageView, RecordStore, SqliteStore, SubmitOutcome,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let app = App::open(config).context("opening appointment store")?;
            run(&app, command)
        }
    }
}

fn run(app: &App<SqliteStore>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(cmd) => {
            print_listing(&app.listing().show()?, cmd.format)?;
            Ok(())
        }
        Command::Show(cmd) => {
            let view = app.form().load(Some(&cmd.id.to_string()))?;
            if matches!(view.mode, FormMode::NotFound { .. }) {
                return Err(Error::RecordNotFound { id: cmd.id }.into());
            }
            print_form(&view, cmd.json)
        }
        Command::Add(cmd) => {
            let mut view = app.form().load(None)?;
            cmd.fields.apply(&mut view.fields);
            submit(app, &mut view)
        }
        Command::Edit(cmd) => {
            let mut view = app.form().load(Some(&cmd.id.to_string()))?;
            if matches!(view.mode, FormMode::NotFound { .. }) {
                return Err(Error::RecordNotFound { id: cmd.id }.into());
            }
            cmd.fields.apply(&mut view.fields);
            submit(app, &mut view)
        }
        Command::Submit(cmd) => {
            let mut view = app.form().load(None)?;
            view.fields.record_id = cmd.id.unwrap_or_default();
            cmd.fields.apply(&mut view.fields);
            submit(app, &mut view)
        }
        Command::Delete(cmd) => {
            let skip_prompt = cmd.yes || !app.config().display.confirm_delete;
            let mut confirmer: Box<dyn Confirm> = if skip_prompt {
                Box::new(AutoConfirm(true))
            } else {
                Box::new(PromptConfirm::new(std::io::stdin().lock(), std::io::stderr()))
            };

            match app.listing().delete(cmd.id, confirmer.as_mut())? {
                DeleteOutcome::Cancelled => println!("Delete cancelled."),
                DeleteOutcome::Deleted { removed, listing } => {
                    if removed == 0 {
                        eprintln!("No appointment with id {}.", cmd.id);
                    }
                    print_listing(&listing, OutputFormat::Table)?;
                }
            }
            Ok(())
        }
        Command::Open(cmd) => match app.open_location(&cmd.location)? {
            PageView::Listing(listing) => {
                let format = if cmd.json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Table
                };
                print_listing(&listing, format)
            }
            PageView::Form(view) => {
                if let FormMode::NotFound { token } = &view.mode {
                    eprintln!("No appointment matches '{token}'; showing a blank form.");
                }
                print_form(&view, cmd.json)
            }
        },
        Command::Status(cmd) => handle_status(app, cmd.json),
        Command::Config(_) => unreachable!("config commands are handled before opening the store"),
    }
}

fn submit(app: &App<SqliteStore>, view: &mut FormView) -> anyhow::Result<()> {
    let outcome = app.form().submit(view)?;
    match &outcome {
        SubmitOutcome::Invalid(_) => {
            print!("{}", render_form(view));
            bail!("appointment not saved: some fields are invalid");
        }
        SubmitOutcome::Created { id } => println!("Created appointment {id}."),
        SubmitOutcome::Updated { id, .. } => println!("Updated appointment {id}."),
        SubmitOutcome::Unmatched { id } => {
            eprintln!("No appointment with id '{id}'; nothing was changed.");
        }
    }

    if let Some(next) = outcome.next_page() {
        tracing::debug!(location = %app.location_of(&next), "Navigating");
        if let PageView::Listing(listing) = app.open_page(&next)? {
            println!();
            print_listing(&listing, OutputFormat::Table)?;
        }
    }
    Ok(())
}

fn print_listing(listing: &Listing, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Plain => print!("{}", listing.to_plain()),
        OutputFormat::Table => print!("{}", listing.to_table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(listing)?),
    }
    Ok(())
}

fn print_form(view: &FormView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_form(view));
    }
    Ok(())
}

fn handle_status(app: &App<SqliteStore>, json: bool) -> anyhow::Result<()> {
    let stats = app.store().stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": app.store().path(),
            "key": app.store().key(),
            "total_records": stats.total_records,
            "blob_size_bytes": stats.blob_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("apptbook status");
        println!("---------------");
        println!("Database:      {}", app.store().path().display());
        println!("Key:           {}", app.store().key());
        println!("Appointments:  {}", stats.total_records);
        println!("Stored bytes:  {}", stats.blob_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Validation]");
                println!(
                    "  National id:        {}",
                    config.validation.national_id_pattern
                );
                println!("  Case insensitive:   {}", config.validation.case_insensitive);
                println!();
                println!("[Navigation]");
                println!("  Listing page:       {}", config.navigation.listing_page);
                println!("  Form page:          {}", config.navigation.form_page);
                println!("  Edit parameter:     {}", config.navigation.edit_param);
                println!();
                println!("[Display]");
                println!("  Empty placeholder:  {}", config.display.empty_placeholder);
                println!("  Confirm delete:     {}", config.display.confirm_delete);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
