use anyhow::{anyhow, Result};
use channel_audit::config::Config;
use channel_audit::llm::recommendations::{Recommendation, RecommendationGenerator};
use channel_audit::pipeline::audit_channel;
use channel_audit::report::{build_recommendation_prompt, render_summary};
use channel_audit::store::{AuditStore, HISTORY_LIMIT};
use channel_audit::youtube::{CatalogSnapshot, ChannelSource, YouTubeClient};
use channel_audit::ChannelAnalysis;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let id_arg = Arg::new("id").value_name("AUDIT_ID").help("Audit id").required(true);
    let json_arg = Arg::new("json")
        .long("json")
        .help("Print JSON instead of the text report")
        .action(ArgAction::SetTrue);

    Command::new("Channel Audit")
        .version("0.1.0")
        .author("TigreRoll")
        .about("YouTube channel performance audit")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("analyze")
                .about("Audit a channel and save the result")
                .arg(
                    Arg::new("channel")
                        .short('c')
                        .long("channel")
                        .value_name("URL_OR_HANDLE")
                        .help("Channel URL, @handle, channel id or name"),
                )
                .arg(
                    Arg::new("snapshot")
                        .short('s')
                        .long("snapshot")
                        .value_name("FILE")
                        .help("Analyse a saved catalog snapshot instead of calling the API"),
                )
                .arg(
                    Arg::new("no-recommendations")
                        .long("no-recommendations")
                        .help("Skip AI recommendations")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-save")
                        .long("no-save")
                        .help("Do not store the audit")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg.clone()),
        )
        .subcommand(
            Command::new("fetch")
                .about("Download a channel catalog into a snapshot file")
                .arg(
                    Arg::new("channel")
                        .short('c')
                        .long("channel")
                        .value_name("URL_OR_HANDLE")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .default_value("./catalog.json"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show a saved audit")
                .arg(id_arg.clone())
                .arg(json_arg),
        )
        .subcommand(
            Command::new("list").about("List saved audits, newest first").arg(
                Arg::new("limit")
                    .short('n')
                    .long("limit")
                    .value_name("NUM")
                    .default_value("20"),
            ),
        )
        .subcommand(
            Command::new("prompt")
                .about("Print the recommendation prompt for a saved audit")
                .arg(id_arg.clone()),
        )
        .subcommand(
            Command::new("recommend")
                .about("Generate recommendations for a saved audit")
                .arg(id_arg.clone()),
        )
        .subcommand(Command::new("delete").about("Delete a saved audit").arg(id_arg))
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| anyhow!("Missing argument: {}", name))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn print_recommendations(recommendations: &[Recommendation]) {
    println!("\nRecommendations");
    for (i, rec) in recommendations.iter().enumerate() {
        println!("  {}. [{:?}/{}] {}", i + 1, rec.priority, rec.category, rec.title);
        println!("     {}", rec.detail);
    }
}

async fn generate_recommendations(config: &Config, analysis: &ChannelAnalysis) -> Result<Vec<Recommendation>> {
    let generator = RecommendationGenerator::from_configs(
        &config.usable_providers(),
        config.recommendations.max_recommendations,
    )?;
    generator.generate(analysis).await
}

async fn run_analyze(config: &Config, store: &AuditStore, matches: &ArgMatches) -> Result<()> {
    let (source, input) = match matches.get_one::<String>("snapshot") {
        Some(path) => {
            let snapshot = CatalogSnapshot::load(path).await?;
            let input = matches
                .get_one::<String>("channel")
                .cloned()
                .unwrap_or_else(|| snapshot.channel.channel_id.clone());
            (Box::new(snapshot) as Box<dyn ChannelSource>, input)
        }
        None => {
            let input = matches
                .get_one::<String>("channel")
                .cloned()
                .ok_or_else(|| anyhow!("Either --channel or --snapshot is required"))?;
            (Box::new(YouTubeClient::new(config.youtube.clone())?) as Box<dyn ChannelSource>, input)
        }
    };

    let analysis = audit_channel(source.as_ref(), &input).await?;

    let audit_id = if matches.get_flag("no-save") {
        None
    } else {
        Some(store.save(analysis.clone()).await?.id)
    };

    let mut recommendations = None;
    let wants_recommendations = config.recommendations.enabled && !matches.get_flag("no-recommendations");
    if wants_recommendations {
        match generate_recommendations(config, &analysis).await {
            Ok(recs) => {
                if let Some(id) = &audit_id {
                    store.update_recommendations(id, recs.clone()).await?;
                }
                recommendations = Some(recs);
            }
            Err(e) => warn!("⚠️ Recommendations unavailable: {}", e),
        }
    }

    if matches.get_flag("json") {
        match &audit_id {
            Some(id) => {
                if let Some(record) = store.load(id).await? {
                    println!("{}", to_json(&record, config.output.pretty_json)?);
                }
            }
            None => println!("{}", to_json(&analysis, config.output.pretty_json)?),
        }
        return Ok(());
    }

    print!("{}", render_summary(&analysis));
    if let Some(recs) = &recommendations {
        print_recommendations(recs);
    }
    if let Some(id) = audit_id {
        println!("\nAudit id: {}", id);
    }

    Ok(())
}

async fn run_fetch(config: &Config, matches: &ArgMatches) -> Result<()> {
    let input = required(matches, "channel")?;
    let output = PathBuf::from(required(matches, "output")?);

    let client = YouTubeClient::new(config.youtube.clone())?;
    let channel = client.resolve_channel(input).await?;
    let videos = client.fetch_all_videos(&channel.channel_id).await?;

    CatalogSnapshot::new(channel, videos).save(&output).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let verbose = matches.get_flag("verbose");

    // Load configuration
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::from_env(), Some(e)),
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = load_error {
        info!("Using default configuration: {}", e);
    }
    config.validate()?;

    if verbose {
        info!("{}", config.summary());
    }

    let store = AuditStore::new(config.storage.audit_dir.clone());

    match matches.subcommand() {
        Some(("analyze", sub)) => run_analyze(&config, &store, sub).await?,
        Some(("fetch", sub)) => run_fetch(&config, sub).await?,
        Some(("show", sub)) => {
            let id = required(sub, "id")?;
            let record = store
                .load(id)
                .await?
                .ok_or_else(|| anyhow!("Audit not found: {}", id))?;

            if sub.get_flag("json") {
                println!("{}", to_json(&record, config.output.pretty_json)?);
            } else {
                println!("Audit {} ({})\n", record.id, record.created_at.format("%Y-%m-%d %H:%M UTC"));
                print!("{}", render_summary(&record.analysis));
                if let Some(recs) = &record.recommendations {
                    print_recommendations(recs);
                }
            }
        }
        Some(("list", sub)) => {
            let limit: usize = match sub.get_one::<String>("limit") {
                Some(value) => value.parse()?,
                None => HISTORY_LIMIT,
            };
            let audits = store.list(limit).await?;
            if audits.is_empty() {
                println!("No saved audits in {}", store.dir().display());
            }
            for audit in audits {
                println!(
                    "{}  {}  {:<30}  {:>5} videos  median {}{}",
                    audit.id,
                    audit.created_at.format("%Y-%m-%d %H:%M"),
                    audit.channel_title,
                    audit.total_videos,
                    audit.median_views,
                    if audit.has_recommendations { "  💡" } else { "" }
                );
            }
        }
        Some(("prompt", sub)) => {
            let id = required(sub, "id")?;
            let record = store
                .load(id)
                .await?
                .ok_or_else(|| anyhow!("Audit not found: {}", id))?;
            println!("{}", build_recommendation_prompt(&record.analysis));
        }
        Some(("recommend", sub)) => {
            let id = required(sub, "id")?;
            let record = store
                .load(id)
                .await?
                .ok_or_else(|| anyhow!("Audit not found: {}", id))?;
            let recommendations = generate_recommendations(&config, &record.analysis).await?;
            store.update_recommendations(id, recommendations.clone()).await?;
            print_recommendations(&recommendations);
        }
        Some(("delete", sub)) => {
            let id = required(sub, "id")?;
            if store.delete(id).await? {
                println!("Deleted {}", id);
            } else {
                return Err(anyhow!("Audit not found: {}", id));
            }
        }
        _ => return Err(anyhow!("Unknown command")),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_cli_parses_analyze() {
        let matches = cli()
            .try_get_matches_from(["channel-audit", "-v", "analyze", "-c", "@rustcorner", "--no-save"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "analyze");
        assert_eq!(sub.get_one::<String>("channel").unwrap(), "@rustcorner");
        assert!(sub.get_flag("no-save"));
        assert!(!sub.get_flag("json"));
    }
}
