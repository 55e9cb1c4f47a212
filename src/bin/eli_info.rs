//! 元件库信息打印
//!
//! 列出已注册的元件库、组件与子组件，以及它们的参数、统计量和端口。

use clap::Parser;
use simkern_rs::elements::builtin_registry;
use simkern_rs::eli::{ElementInfo, LibraryInfo};

#[derive(Debug, Parser)]
#[command(name = "eli-info", about = "打印元件库数据库")]
struct Args {
    /// 只打印这个库
    #[arg(long)]
    library: Option<String>,
    /// 以 JSON 输出（每个描述符一个对象）
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 日志走 stderr，stdout 留给数据库内容
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    let registry = builtin_registry()?;

    let libraries: Vec<&LibraryInfo> = match &args.library {
        Some(name) => {
            let lib = registry
                .library(name)
                .ok_or_else(|| format!("unknown library `{name}`"))?;
            vec![lib]
        }
        None => registry.libraries().collect(),
    };

    if args.json {
        let infos: Vec<&ElementInfo> = libraries
            .iter()
            .copied()
            .flat_map(|lib| lib.components().chain(lib.subcomponents()))
            .map(|info| &**info)
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for lib in libraries {
        println!("library : {}", lib.name());
        print!("{lib}");
    }
    Ok(())
}
