use std::io::Write;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::client::{MovieDbClient, RequestTemplate};
use crate::endpoint::{Endpoint, MovieList};
use crate::error::{MovieDbError, Result};
use crate::progress::{Progress, Spinner};
use crate::render::{raw_lines, render};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "moviedb",
    version,
    about = "Browse people and movies from The Movie Database",
    after_help = "Environment:\n  \
        MOVIEDB_API_KEY   API read access token (API_KEY is read when unset)\n  \
        MOVIEDB_BASE_URL  API host, default https://api.themoviedb.org\n  \
        RUST_LOG          log filter, default warn"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the most popular persons
    GetPersons(GetPersonsArgs),
    /// Fetch the data of a single person
    GetPerson(GetPersonArgs),
    /// Fetch popular or now playing movies
    GetMovies(GetMoviesArgs),
    /// Fetch the data or the reviews of a single movie
    GetMovie(GetMovieArgs),
}

impl Commands {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Commands::GetPersons(args) => Endpoint::PopularPersons { page: args.page },
            Commands::GetPerson(args) => Endpoint::Person {
                id: args.id.clone(),
            },
            Commands::GetMovies(args) => Endpoint::Movies {
                list: MovieList::from_flags(args.popular, args.now_playing),
                page: args.page,
            },
            Commands::GetMovie(args) => Endpoint::movie(args.id.clone(), args.review),
        }
    }

    pub fn output(&self) -> &OutputArgs {
        match self {
            Commands::GetPersons(args) => &args.output,
            Commands::GetPerson(args) => &args.output,
            Commands::GetMovies(args) => &args.output,
            Commands::GetMovie(args) => &args.output,
        }
    }
}

#[derive(Args)]
pub struct OutputArgs {
    /// Print the raw JSON response instead of formatted text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GetPersonsArgs {
    /// Fetch the popular persons (the only person list available)
    #[arg(short, long)]
    pub popular: bool,

    /// The page of persons results to fetch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct GetPersonArgs {
    /// The id of the person
    #[arg(short, long, value_parser = parse_id)]
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct GetMoviesArgs {
    /// The page of movies results to fetch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Fetch the popular movies (default)
    #[arg(short, long)]
    pub popular: bool,

    /// Fetch the movies that are playing now
    #[arg(short, long)]
    pub now_playing: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct GetMovieArgs {
    /// The id of the movie
    #[arg(short, long, value_parser = parse_id)]
    pub id: String,

    /// Fetch the reviews of the movie
    #[arg(short, long)]
    pub review: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

fn parse_id(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("id must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

pub fn handle_fetch(command: &Commands, settings: &Settings) -> Result<()> {
    let endpoint = command.endpoint();
    let template = RequestTemplate::new(&settings.base_url, &settings.token);
    let client = MovieDbClient::new()?;

    let mut spinner = Spinner::start(endpoint.loading_message());
    let mut stdout = std::io::stdout().lock();
    run_endpoint(
        &client,
        &template,
        &endpoint,
        command.output().json,
        &mut spinner,
        &mut stdout,
    )
}

/// Request, render, report. Output is written only once the whole response
/// has been rendered.
pub fn run_endpoint<P, W>(
    client: &MovieDbClient,
    template: &RequestTemplate,
    endpoint: &Endpoint,
    json: bool,
    progress: &mut P,
    out: &mut W,
) -> Result<()>
where
    P: Progress + ?Sized,
    W: Write,
{
    let descriptor = template.with_path(endpoint.path());
    let payload = match client.fetch(&descriptor) {
        Ok(payload) => payload,
        Err(err) => {
            progress.fail(endpoint.failure_message());
            return Err(err);
        }
    };

    let lines = match build_output(endpoint, &payload, json) {
        Ok(lines) => lines,
        Err(err) => {
            progress.fail(endpoint.failure_message());
            return Err(err);
        }
    };
    progress.succeed(endpoint.success_message());

    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn build_output(endpoint: &Endpoint, payload: &Value, json: bool) -> Result<Vec<String>> {
    if json {
        return raw_lines(payload);
    }
    match render(endpoint, payload) {
        Ok(lines) => Ok(lines),
        Err(err @ MovieDbError::Render(_)) => {
            tracing::warn!(%err, "printing the raw response instead");
            raw_lines(payload)
        }
        Err(err) => Err(err),
    }
}
