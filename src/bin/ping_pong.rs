//! 两个组件的乒乓示例
//!
//! 不需要图文件：直接用内核 API 声明 `demo.Pinger` 与 `demo.Ponger` 并连线。

use std::sync::Arc;

use clap::Parser;
use simkern_rs::elements::{Pinger, Ponger, builtin_registry};
use simkern_rs::kernel::Kernel;
use simkern_rs::params::Params;
use simkern_rs::sim::Simulator;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "ping-pong", about = "Pinger/Ponger 示例")]
struct Args {
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// Pinger 时钟频率
    #[arg(long, default_value = "1GHz")]
    clock: String,
    /// 单向链路延迟
    #[arg(long, default_value = "10ns")]
    latency: String,
    /// Ponger 服务时间（纳秒）
    #[arg(long, default_value_t = 0)]
    service_ns: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化 tracing
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
    let registry = Arc::new(builtin_registry()?);
    let mut kernel = Kernel::new(registry);

    kernel.add_component(
        "pinger",
        "demo.Pinger",
        Params::new()
            .with("rounds", args.rounds.to_string())
            .with("clock", args.clock.as_str()),
    )?;
    kernel.add_component(
        "ponger",
        "demo.Ponger",
        Params::new().with("service_ns", args.service_ns.to_string()),
    )?;
    kernel.connect("wire", ("pinger", "out"), ("ponger", "in"), &args.latency)?;
    kernel.build()?;

    let mut sim = Simulator::default();
    kernel.setup(&mut sim);
    sim.run(&mut kernel);
    kernel.finish(&mut sim);

    let pinger = kernel
        .component_as::<Pinger>("pinger")
        .ok_or("pinger missing")?;
    let ponger = kernel
        .component_as::<Ponger>("ponger")
        .ok_or("ponger missing")?;
    info!(now = %sim.now(), "✅ 完成");
    println!(
        "ping_pong rounds={} sent={} received={} served={} finished_at={}",
        args.rounds,
        pinger.sent(),
        pinger.received(),
        ponger.served(),
        pinger.finished_at().map_or(0, |t| t.ticks())
    );
    Ok(())
}
