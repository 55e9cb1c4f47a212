//! 按 graph.json 构建组件图并运行

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use simkern_rs::elements::builtin_registry;
use simkern_rs::kernel::{GraphSpec, Kernel};
use simkern_rs::sim::{SimTime, Simulator};

#[derive(Debug, Parser)]
#[command(name = "graph-sim", about = "Run a component graph (graph.json)")]
struct Args {
    /// Path to graph.json
    #[arg(long)]
    graph: PathBuf,

    /// Run until this time (ns); defaults to running until exit or an empty queue
    #[arg(long)]
    until_ns: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let graph = GraphSpec::from_file(&args.graph)?;
    let registry = Arc::new(builtin_registry()?);
    let mut kernel = Kernel::from_graph(registry, &graph)?;

    let mut sim = Simulator::default();
    kernel.setup(&mut sim);
    match args.until_ns {
        Some(ns) => {
            let until = kernel.time_lord_mut().nano()?.to_core(ns);
            sim.run_until(until, &mut kernel);
        }
        None => sim.run(&mut kernel),
    }
    kernel.finish(&mut sim);

    let now: SimTime = sim.now();
    let now_ns = kernel.time_lord_mut().nano()?.from_core(now);
    println!(
        "done @ {now_ns}ns components={} stopped={} exit_refs={}",
        kernel.len(),
        sim.is_stopped(),
        kernel.exit().ref_count()
    );
    Ok(())
}
