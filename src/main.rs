use chrono::Utc;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classroom_srs::config::{self, ReviewSettings};
use classroom_srs::db::{self, DbPool};
use classroom_srs::domain::{CardType, ReviewCard, ReviewRating};
use classroom_srs::{profile_log, profiling, services};
#[cfg(feature = "profiling")]
use classroom_srs::profiling::EventType;

const USAGE: &str = "\
usage: classroom_srs <command> [args]

  add-card <student> <subject> <front> <back> [flashcard|vocabulary]
  deactivate <card>
  queue <student> [max]              start a session with the due cards
  review <student> <card> <again|hard|good|easy>
  finish <session> <total> <correct>
  stats <student>
  subject <subject>";

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "classroom_srs=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  // Initialize profiling (no-op if feature disabled)
  profiling::init();

  let args: Vec<String> = std::env::args().skip(1).collect();
  let Some(command) = args.first() else {
    eprintln!("{}", USAGE);
    return ExitCode::FAILURE;
  };

  profile_log!(EventType::Command { name: command.clone() });

  let settings = config::load_review_settings();
  let pool = match db::init_db(&config::load_database_path()) {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!("Failed to initialize database: {}", e);
      return ExitCode::FAILURE;
    }
  };

  let result = run(command, &args[1..], &pool, &settings);
  profiling::shutdown();

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(command: &str, args: &[String], pool: &DbPool, settings: &ReviewSettings) -> CliResult {
  let mut conn = db::try_lock(pool)?;
  let now = Utc::now();

  match (command, args) {
    ("add-card", [student, subject, front, back, rest @ ..]) => {
      let card_type = match rest.first() {
        Some(t) => CardType::from_str(t).ok_or_else(|| format!("unknown card type '{}'", t))?,
        None => CardType::Flashcard,
      };
      let card = ReviewCard::new(parse_id(student)?, parse_id(subject)?, front.clone(), back.clone(), card_type);
      let id = db::insert_card(&conn, &card)?;
      println!("{}", id);
    }
    ("deactivate", [card]) => {
      if !db::deactivate_card(&conn, parse_id(card)?)? {
        return Err(format!("card {} not found or already inactive", card).into());
      }
    }
    ("queue", [student, rest @ ..]) => {
      let max = match rest.first() {
        Some(n) => n.parse::<usize>()?,
        None => settings.session_size,
      };
      let plan = services::start_session(&conn, parse_id(student)?, max, now, &mut rand::rng())?;
      if plan.is_empty() {
        tracing::info!("No cards due for student {}", student);
      }
      print_json(&serde_json::json!({
        "session_id": plan.session.id,
        "cards": plan.cards,
      }))?;
    }
    ("review", [student, card, rating]) => {
      let rating = ReviewRating::from_str(rating).ok_or_else(|| format!("unknown rating '{}'", rating))?;
      let outcome = services::submit_review(
        &mut conn,
        &settings.policy(),
        parse_id(student)?,
        parse_id(card)?,
        rating,
        now,
      )
      .map_err(|e| {
        if e.is_retryable() {
          tracing::warn!("Review not saved, safe to retry: {}", e);
        }
        e
      })?;
      print_json(&outcome)?;
    }
    ("finish", [session, total, correct]) => {
      let session = services::complete_session(
        &conn,
        parse_id(session)?,
        total.parse()?,
        correct.parse()?,
        settings.xp_per_correct,
        now,
      )?;
      print_json(&session)?;
    }
    ("stats", [student]) => {
      let report = services::student_report(&conn, settings, parse_id(student)?, now)?;
      print_json(&report)?;
    }
    ("subject", [subject]) => {
      let report = services::subject_report(&conn, settings, parse_id(subject)?)?;
      print_json(&report)?;
    }
    _ => return Err(USAGE.into()),
  }

  Ok(())
}

fn parse_id(s: &str) -> Result<i64, String> {
  s.parse::<i64>().map_err(|_| format!("invalid id '{}'", s))
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
