// src/cli.rs
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::auth::{PasswordResetConfirm, RegistrationRequest};
use crate::error::Failure;
use crate::presenter::{present, present_upload};
use crate::types::{ResumeId, VacancyId};
use crate::utils::{read_resume_file, validate_file_extension, RESUME_EXTENSIONS};
use crate::MatchClient;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REQUEST_FAILED: &str = "Request failed. Please try again.";

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(about = "Upload a resume and match it against job vacancies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the token pair
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Request or confirm a password reset
    ResetPassword {
        #[command(subcommand)]
        step: ResetStep,
    },
    /// Show the logged-in account
    Profile,
    /// List vacancies
    Vacancies,
    /// Show one vacancy
    Vacancy { id: VacancyId },
    /// Select the vacancy to match against
    Select { id: VacancyId },
    /// Upload a resume file
    Upload { file: PathBuf },
    /// Match a resume against a vacancy, defaulting to the session selections
    Match {
        #[arg(long)]
        resume_id: Option<ResumeId>,
        #[arg(long)]
        vacancy_id: Option<VacancyId>,
    },
    /// Show the session
    Status,
    /// Remove everything the session stored
    Clear,
}

#[derive(Subcommand)]
pub enum ResetStep {
    /// Send a reset link to an email address
    Request { email: String },
    /// Set a new password with the uid and token from the reset link
    Confirm {
        uid: String,
        token: String,
        #[arg(long)]
        new_password: String,
    },
}

/// Run one command. Workflow failures are printed; only local plumbing
/// (reading the résumé file) returns an error.
pub async fn handle_command(client: &MatchClient, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            match client.auth.login(&username, &password).await {
                Ok(()) => println!("✅ Logged in as {}", username),
                Err(e) => println!("❌ {}", Failure::from_api(&e, LOGIN_FAILED)),
            }
        }

        Command::Logout => {
            client.auth.logout();
            println!("✅ Logged out");
        }

        Command::Register {
            username,
            email,
            password,
        } => {
            let request = RegistrationRequest {
                username,
                email,
                password1: password.clone(),
                password2: password,
            };
            match client.auth.register(&request).await {
                Ok(()) => println!("✅ Account {} registered", request.username),
                Err(e) => println!("❌ {}", Failure::from_api(&e, REQUEST_FAILED)),
            }
        }

        Command::ResetPassword { step } => {
            let outcome = match step {
                ResetStep::Request { email } => client
                    .auth
                    .request_password_reset(&email)
                    .await
                    .map(|()| "Password reset link has been sent to your email."),
                ResetStep::Confirm {
                    uid,
                    token,
                    new_password,
                } => client
                    .auth
                    .confirm_password_reset(&PasswordResetConfirm {
                        uid,
                        token,
                        new_password1: new_password.clone(),
                        new_password2: new_password,
                    })
                    .await
                    .map(|()| "Password has been reset."),
            };
            match outcome {
                Ok(message) => println!("✅ {}", message),
                Err(e) => println!("❌ {}", Failure::from_api(&e, REQUEST_FAILED)),
            }
        }

        Command::Profile => match client.auth.profile().await {
            Ok(profile) => {
                println!("👤 {} (id {})", profile.username, profile.id);
                if let Some(email) = profile.email {
                    println!("   Email: {}", email);
                }
                if let Some(role) = profile.role {
                    println!("   Role: {}", role);
                }
            }
            Err(e) => println!("❌ {}", Failure::from_api(&e, REQUEST_FAILED)),
        },

        Command::Vacancies => match client.vacancies.list().await {
            Ok(vacancies) if vacancies.is_empty() => println!("No vacancies available."),
            Ok(vacancies) => {
                let selected = client.session.vacancy_id();
                for vacancy in vacancies {
                    let marker = if Some(vacancy.id) == selected { "*" } else { " " };
                    println!(
                        "{} {:>4}  {} [{}]",
                        marker,
                        vacancy.id,
                        vacancy.title,
                        vacancy.location.as_deref().unwrap_or("Not specified")
                    );
                }
            }
            Err(e) => println!("❌ {}", Failure::from_api(&e, "Could not fetch vacancies.")),
        },

        Command::Vacancy { id } => match client.vacancies.get(id).await {
            Ok(vacancy) => {
                println!("{} (id {})", vacancy.title, vacancy.id);
                println!("   Location: {}", vacancy.location.as_deref().unwrap_or("Not specified"));
                println!("   Type: {}", vacancy.job_type);
                println!("   Experience: {} years", vacancy.experience_required);
                if let Some(salary) = vacancy.salary_range() {
                    println!("   Salary: {}", salary);
                }
                println!("   Skills: {}", vacancy.skills().join(", "));
                if !vacancy.description.is_empty() {
                    println!("\n{}", vacancy.description);
                }
            }
            Err(e) => println!("❌ {}", Failure::from_api(&e, REQUEST_FAILED)),
        },

        Command::Select { id } => {
            client.vacancies.select(id);
            println!("✅ Vacancy {} selected", id);
        }

        Command::Upload { file } => {
            validate_file_extension(&file.to_string_lossy(), &RESUME_EXTENSIONS)?;
            let (file_name, bytes) = read_resume_file(&file).await?;
            let state = client.uploads.upload_resume(&file_name, bytes).await;
            println!("{}", present_upload(&state));
        }

        Command::Match {
            resume_id,
            vacancy_id,
        } => {
            let resume = resume_id.or_else(|| client.session.resume_id());
            let vacancy = vacancy_id.or_else(|| client.session.vacancy_id());
            let state = client.matches.request_match(resume, vacancy).await;
            println!("{}", present(&state));
        }

        Command::Status => {
            let state = client.session.snapshot();
            match &state.credential {
                Some(credential) => match credential.access_expiry() {
                    Some(exp) if exp <= Utc::now() => println!("🔒 Session expired, log in again"),
                    Some(exp) => println!("🔓 Logged in (access token valid until {})", exp),
                    None => println!("🔓 Logged in"),
                },
                None => println!("🔒 Not logged in"),
            }
            match state.vacancy {
                Some(id) => println!("   Vacancy: {}", id),
                None => println!("   Vacancy: none selected"),
            }
            match state.resume {
                Some(id) => println!("   Resume: {}", id),
                None => println!("   Resume: none uploaded"),
            }
        }

        Command::Clear => {
            client.session.clear();
            info!("Session cleared from the command line");
            println!("✅ Session cleared");
        }
    }

    Ok(())
}
