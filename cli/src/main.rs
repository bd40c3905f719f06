/*
    playlist-migrate-rs | Rust CLI tool to migrate Spotify playlists to YouTube Music.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Input;
use dotenvy::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use migrate_core::{
    get_spotify_client, get_youtube_music_client, FileFailureRecorder, MigrationResult, Migrator,
    PlaylistRef, ProgressSink, SpotifySource, TargetCatalog, TrackReport,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "playlist-migrate")]
#[command(about = "Migrate a Spotify playlist to YouTube Music", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copies a Spotify playlist into a private YouTube Music playlist with the same name
    Migrate {
        /// Spotify playlist URL (prompted for if omitted)
        #[arg(value_name = "URL")]
        url: Option<String>,
        /// Browser header file used to authenticate against YouTube Music
        #[arg(long, env = "YTMUSIC_HEADERS", default_value = "browser.json")]
        headers: PathBuf,
        /// Directory for the conversion_failures_*.log file
        #[arg(long, env = "MIGRATE_LOG_DIR", default_value = ".")]
        log_dir: PathBuf,
        /// Output the detailed migration report to a JSON file
        #[arg(long)]
        json: Option<String>,
    },
    /// Lists your YouTube Music library playlists with their IDs
    List {
        /// Browser header file used to authenticate against YouTube Music
        #[arg(long, env = "YTMUSIC_HEADERS", default_value = "browser.json")]
        headers: PathBuf,
        /// Show at most this many playlists
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // Silently ignore
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate {
            url,
            headers,
            log_dir,
            json,
        } => {
            handle_migrate(url, &headers, &log_dir, json.as_deref()).await;
        }
        Commands::List { headers, limit } => {
            handle_list(&headers, limit).await;
        }
    }
}

struct BarProgress {
    bar: ProgressBar,
}

impl ProgressSink for BarProgress {
    fn start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_message("Converting tracks");
    }

    fn track_done(&mut self, report: &TrackReport) {
        if report.outcome.is_failure() {
            self.bar.println(format!("   [!] {}", report));
        }
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn progress_bar() -> ProgressBar {
    let style =
        ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(0).with_style(style)
}

fn prompt_for_url() -> anyhow::Result<String> {
    println!("Enter the Spotify playlist URL. It should look like");
    println!("https://open.spotify.com/playlist/3rhmVUKcG2...");
    let url: String = Input::new()
        .with_prompt("URL")
        .interact_text()
        .context("Failed to read the playlist URL")?;
    Ok(url)
}

async fn handle_migrate(
    url: Option<String>,
    headers: &Path,
    log_dir: &Path,
    json_path: Option<&str>,
) {
    let url = match url.map(Ok).unwrap_or_else(prompt_for_url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            process::exit(1);
        }
    };

    // Reject bad input before any authentication round-trips.
    if let Err(e) = PlaylistRef::parse(&url) {
        eprintln!("{}", e);
        eprintln!("Please provide a valid Spotify playlist URL.");
        process::exit(1);
    }

    let mut migrator = match build_migrator(headers, log_dir).await {
        Ok(m) => m.with_progress(Box::new(BarProgress { bar: progress_bar() })),
        Err(e) => {
            eprintln!("[ERROR] {:#}", e);
            process::exit(1);
        }
    };

    println!("Migrating {} to YouTube Music...", url);

    match migrator.migrate(&url).await {
        Ok(result) => {
            print_summary(&result);

            if let Some(path) = json_path {
                save_report(&result, path);
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("[ERROR] Migration failed: {}", e);
            process::exit(1);
        }
    }
}

async fn build_migrator(
    headers: &Path,
    log_dir: &Path,
) -> anyhow::Result<Migrator<SpotifySource, migrate_core::YouTubeMusic, FileFailureRecorder>> {
    debug!("Reading YouTube Music headers from {}", headers.display());
    let ytmusic = get_youtube_music_client(headers)?;
    let spotify = get_spotify_client()
        .await
        .context("Error initializing Spotify client")?;
    let recorder = FileFailureRecorder::create(log_dir)?;

    Ok(Migrator::new(SpotifySource::new(spotify), ytmusic, recorder))
}

fn print_summary(result: &MigrationResult) {
    println!();
    println!("---------------------------------------------------");
    println!("CONVERSION COMPLETE");
    println!("---------------------------------------------------");
    println!(
        "Playlist:             {} ({})",
        result.playlist_title,
        if result.created_playlist {
            "created"
        } else {
            "existing"
        }
    );
    println!("Added:                {}", result.added_count);
    println!("Skipped (existing):   {}", result.skipped_duplicate_count);
    println!("Failed:               {}", result.failed_count);
    println!("Unavailable:          {}", result.skipped_absent_count);
    println!("Total Source Tracks:  {}", result.total_source_tracks);
    println!("---------------------------------------------------");
    println!("URL: {}", result.target_playlist_url);

    if let Some(warning) = &result.dedup_seed_warning {
        println!();
        println!("[WARNING] {}", warning);
    }
    if let Some(log) = &result.failure_log {
        println!("Failed conversions logged to: {}", log);
    }
    if result.failure_log_errors > 0 {
        println!(
            "[WARNING] {} entries could not be written to the failure log",
            result.failure_log_errors
        );
    }
}

fn save_report(result: &MigrationResult, path: &str) {
    match File::create(path) {
        Ok(mut file) => {
            let json_content = serde_json::to_string_pretty(result).unwrap_or_default();
            if let Err(e) = file.write_all(json_content.as_bytes()) {
                eprintln!();
                eprintln!("[ERROR] Failed to write report to file: {}", e);
            } else {
                println!();
                println!("[SAVED] Detailed report saved to: {}", path);
            }
        }
        Err(e) => eprintln!("[ERROR] Failed to create file '{}': {}", path, e),
    }
}

async fn handle_list(headers: &Path, limit: Option<usize>) {
    let ytmusic = match get_youtube_music_client(headers) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            process::exit(1);
        }
    };
    println!("Fetching your YouTube Music playlists...");

    match ytmusic.library_playlists().await {
        Ok(playlists) => {
            println!();
            println!("{:<40} | {:<40}", "ID", "Title");
            println!("{:-<40}-+-{:-<40}", "", "");

            for pl in playlists.into_iter().take(limit.unwrap_or(usize::MAX)) {
                let title = if pl.title.chars().count() > 38 {
                    format!("{}..", pl.title.chars().take(38).collect::<String>())
                } else {
                    pl.title
                };
                println!("{:<40} | {:<40}", pl.id, title);
            }
        }
        Err(e) => {
            eprintln!("Failed to list playlists: {}", e);
            process::exit(1);
        }
    }
}
