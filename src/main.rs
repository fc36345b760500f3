//! `structa` binary: wires CLI → config/problem loading → search →
//! KIF output.

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use proof_engine::find_all_paths_to_target;
use proof_io::config::{EngineConfig, StPosOutputMode};
use proof_io::problem::{Problem, STANDARD_OPENING_SFEN};
use proof_io::{output, render, system_info, Cli, RunError};

const CONFIG_PATH: &str = "config.txt";

fn main() {
    let cli = Cli::parse();
    let wait = cli.should_wait();
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("設定エラー: {err}");
            1
        }
    };
    if wait {
        println!("Press Enter to exit...");
        let _ = io::stdin().lock().lines().next();
    }
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = EngineConfig::load(CONFIG_PATH).context("loading config.txt")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.env_filter_directive()))
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "【開始】Structa"
    );

    let input_path = config
        .resolve_input(cli.input.as_deref())
        .ok_or(RunError::NoInputFile)?;
    let output_path = config
        .resolve_output(cli.output.as_deref())
        .ok_or(RunError::NoOutputFile)?;

    let problem = Problem::load(&input_path)?;
    let mut output_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&output_path)
        .map_err(|source| RunError::OutputWrite {
            path: output_path.clone(),
            source,
        })?;

    let start = proof_core::Position::from_sfen(&problem.start_sfen)?;
    let target = proof_core::Position::from_sfen(&problem.target_sfen)?;

    tracing::info!(sfen = %problem.start_sfen, "開始局面");
    tracing::info!(sfen = %problem.target_sfen, "指定局面");

    let show_side_by_side = match config.st_pos_output_mode {
        StPosOutputMode::AlwaysSideBySide => true,
        StPosOutputMode::SideBySideIfCustomStart => problem.start_sfen != STANDARD_OPENING_SFEN,
        StPosOutputMode::TargetOnly => false,
    };
    let diagram = if show_side_by_side {
        render::side_by_side(&start, &target, "        ").join("\n")
    } else {
        render::board_lines(&target).join("\n")
    };
    tracing::info!("\n{diagram}");

    tracing::info!(max_depth = problem.max_depth, "指定手数");
    tracing::info!(limit = problem.limit, "解数上限");
    if !problem.fixed_squares.is_empty() {
        tracing::info!(fixed_squares = ?problem.fixed_squares, "不動駒");
    }

    system_info::SystemInfo::probe().log();

    tracing::info!("探索中…");
    let (solutions, stats) = find_all_paths_to_target(
        &start,
        &target,
        problem.max_depth,
        problem.limit,
        &problem.fixed_squares,
        config.tt_memory_bytes(),
        problem.margin,
        problem.debug_solution.as_deref(),
    )?;

    tracing::info!(count = solutions.len(), "検出解数");
    for (i, solution) in solutions.iter().enumerate() {
        output::write_solution(&mut output_file, i + 1, &start, solution).map_err(|source| {
            RunError::OutputWrite {
                path: output_path.clone(),
                source,
            }
        })?;
    }
    output_file.flush().map_err(|source| RunError::OutputWrite {
        path: output_path.clone(),
        source,
    })?;

    log_stats(&stats, problem.margin, config.tt_memory_mb);
    Ok(())
}

fn log_stats(stats: &proof_engine::SearchStats, margin: u32, tt_memory_mb: u32) {
    tracing::debug!(nodes = stats.nodes_expanded, "総ノード数");
    tracing::debug!(pruned = stats.pruned_by_need, "盤上手数計算での枝刈り");
    tracing::debug!(pruned = stats.pruned_by_hand_black, "先手持駒での枝刈り");
    tracing::debug!(pruned = stats.pruned_by_hand_white, "後手持駒での枝刈り");
    for (depth, count) in stats.pruned_per_depth.iter().enumerate() {
        if *count > 0 {
            tracing::debug!(depth, count, "手数別枝刈り");
        }
    }
    let hit_rate = if stats.tt_lookups > 0 {
        stats.tt_hits as f64 / stats.tt_lookups as f64 * 100.0
    } else {
        0.0
    };
    tracing::debug!(
        lookups = stats.tt_lookups,
        hits = stats.tt_hits,
        hit_rate,
        stores = stats.tt_stores,
        updates = stats.tt_updates,
        evictions = stats.tt_evictions,
        size = stats.tt_final_size,
        capacity = stats.tt_capacity,
        margin,
        tt_memory_mb,
        "置換表統計"
    );
}
