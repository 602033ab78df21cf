use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use deck_core::app::{ProjectListViewModel, ViewModelBuilder, ViewState};
use deck_core::config::DeckConfig;
use deck_core::domain::{ProjectDescriptor, ProjectId, format_timestamp};
use deck_core::impls::{InMemoryNotifier, InMemoryProjectGateway};
use deck_core::store::ModeFilter;

/// 標準入力から 1 行 1 コマンドで一覧画面を操作する
#[derive(Parser, Debug)]
#[command(name = "deck", version, about = "Interactive shell for the project list view-model")]
struct Cli {
    /// 設定ファイル（省略時は DECK_CONFIG、なければ既定値）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 起動時に作るデモプロジェクトの数
    #[arg(long, default_value_t = 3)]
    seed: usize,
}

const HELP: &str = "\
commands:
  refresh | list | search <text> | mode <all|pipeline|hub>
  pipelines <id> | close-pipelines | jobs <id> | close-jobs
  edit <id> | draft <id> <text> | commit <id>
  delete <id> | type <text> | confirm | cancel
  tour | close-tour | create <name> | help | quit
<id> may be a project id or a 1-based row number of the list";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DeckConfig::load(cli.config.as_deref())?;

    let gateway = Arc::new(InMemoryProjectGateway::new().with_latency(config.gateway.latency()));
    gateway.seed_demo(cli.seed).await;
    let notifier = Arc::new(InMemoryNotifier::new());
    let vm = ViewModelBuilder::from_config(&config)
        .gateway(gateway)
        .notifier(notifier.clone())
        .build()?;

    // 初回表示
    if let Err(error) = vm.refresh().await {
        tracing::warn!(%error, "initial refresh failed");
    }
    render(&vm.snapshot());
    print_notices(&notifier);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match run(&vm, line).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Render) => render(&vm.snapshot()),
            Ok(Flow::Quiet) => {}
            Err(error) => println!("! {error}"),
        }
        print_notices(&notifier);
    }
    Ok(())
}

enum Flow {
    Render,
    Quiet,
    Quit,
}

async fn run(vm: &ProjectListViewModel, line: &str) -> Result<Flow> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match command {
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" => {
            println!("{HELP}");
            return Ok(Flow::Quiet);
        }
        "refresh" => {
            vm.refresh().await?;
        }
        "list" => {}
        "search" => vm.search(rest),
        "mode" => vm.filter_by_mode(rest.parse::<ModeFilter>().map_err(anyhow::Error::msg)?),
        "pipelines" => {
            vm.open_pipelines(&resolve(vm, rest)?).await?;
        }
        "close-pipelines" => vm.close_pipelines(),
        "jobs" => {
            vm.open_jobs(&resolve(vm, rest)?).await?;
        }
        "close-jobs" => vm.close_jobs(),
        "edit" => vm.begin_edit(&resolve(vm, rest)?)?,
        "draft" => {
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            vm.set_draft(&resolve(vm, id)?, text)?;
        }
        "commit" => {
            let outcome = vm.commit_edit(&resolve(vm, rest)?).await?;
            tracing::debug!(?outcome, "commit finished");
        }
        "delete" => vm.request_delete(&resolve(vm, rest)?)?,
        "type" => {
            let enabled = vm.type_delete_confirmation(rest)?;
            println!("confirm button: {}", if enabled { "enabled" } else { "disabled" });
            return Ok(Flow::Quiet);
        }
        "confirm" => {
            let outcome = vm.confirm_delete().await?;
            println!("delete: {outcome:?}");
        }
        "cancel" => vm.cancel_delete()?,
        "tour" => {
            println!("show tour: {}", vm.should_show_tour());
            return Ok(Flow::Quiet);
        }
        "close-tour" => {
            vm.close_tour();
            return Ok(Flow::Quiet);
        }
        "create" => {
            vm.open_create_dialog();
            let project = vm.create_project(ProjectDescriptor::new(rest)).await?;
            println!("created {}", project.project_id);
        }
        other => anyhow::bail!("unknown command '{other}' (try 'help')"),
    }
    Ok(Flow::Render)
}

/// 行番号（1 始まり）またはプロジェクト ID を解決する
fn resolve(vm: &ProjectListViewModel, arg: &str) -> Result<ProjectId> {
    if arg.is_empty() {
        anyhow::bail!("missing project id");
    }
    if let Ok(row) = arg.parse::<usize>() {
        let snapshot = vm.snapshot();
        return row
            .checked_sub(1)
            .and_then(|idx| snapshot.display().get(idx))
            .map(|p| p.project_id.clone())
            .ok_or_else(|| anyhow::anyhow!("no row {row} in the list"));
    }
    Ok(ProjectId::from(arg))
}

fn render(state: &ViewState) {
    let projects = &state.projects;
    println!(
        "== projects ({} shown / {} total, {} editing){}",
        projects.display().len(),
        projects.full().len(),
        state.edits.editing_count(),
        if projects.is_loading() { " [loading]" } else { "" }
    );
    for (row, project) in projects.display().iter().enumerate() {
        let name = match state.edits.entry(&project.project_id) {
            Some(entry) if entry.committing => format!("[saving: {}]", entry.draft),
            Some(entry) => format!("[editing: {}]", entry.draft),
            None => project.name().to_string(),
        };
        println!(
            "{:>3}. {:<36} {:<28} {:<8} nodes={} graphs={} jobs={} created={}",
            row + 1,
            project.project_id.as_str(),
            name,
            project.effective_mode().label(),
            project.node_count(),
            project.graph_count,
            project.job_count,
            format_timestamp(&project.created_at),
        );
    }

    if let Some(target) = state.pipelines.target() {
        let status = if state.pipelines.is_loading() { " [loading]" } else { "" };
        println!("-- pipelines of {target}{status}");
        for pipeline in state.pipelines.items() {
            println!("     {}", pipeline.name);
        }
    }

    if let Some(target) = state.jobs.target() {
        let status = if state.jobs.is_loading() { " [loading]" } else { "" };
        println!("-- recent jobs of {target}{status}");
        for job in state.jobs.items() {
            let badge = job.badge().map(|b| b.as_str()).unwrap_or("-");
            println!(
                "     {} {:<10} ({badge}) {}",
                job.job_id,
                job.status,
                format_timestamp(&job.created_at)
            );
        }
    }

    if let Some(dialog) = &state.deletion {
        println!(
            "-- delete {} ? type '{}' to confirm (input: '{}', phase: {:?})",
            dialog.project_id(),
            dialog.guard().unwrap_or("<unnamed: cannot be confirmed>"),
            dialog.input(),
            dialog.phase()
        );
    }
}

fn print_notices(notifier: &InMemoryNotifier) {
    for notice in notifier.drain() {
        match serde_json::to_string(&notice) {
            Ok(json) => println!("notice: {json}"),
            Err(error) => tracing::warn!(%error, "failed to encode notice"),
        }
    }
}
