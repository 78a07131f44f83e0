use std::collections::HashMap;

use clap::Parser;

use crate::cli::Args;

mod cli;

fn main() -> anyhow::Result<()> {
    install_tracing();
    run(Args::parse())
}

fn install_tracing() {
    let filter = std::env::var("RCL_ARGS_LOG")
        .ok()
        .and_then(|v| tracing_subscriber::EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Args) -> anyhow::Result<()> {
    let mut argv = cli.argv;
    if argv.is_empty() {
        argv.push("rcl-args".to_string());
    }

    let parsed = rcl_args::parse(&argv)?;
    print_summary(&parsed);

    if let Some(name) = &cli.resolve_topic {
        let resolver = rcl_args::RemapResolver { local: &parsed.remap_rules, global: &[], use_global: false };
        let substitutions = HashMap::new();
        match resolver.remap_topic_name(&cli.node_name, name, &cli.node_namespace, &substitutions) {
            Ok(resolved) => println!("resolved: {name} -> {resolved}"),
            Err(e) => eprintln!("failed to resolve {name}: {e}"),
        }
    }

    Ok(())
}

fn print_summary(parsed: &rcl_args::ParsedArguments) {
    println!("remap rules:");
    for rule in &parsed.remap_rules {
        println!("  {:?} {:?} -> {}", rule.kind, rule.pattern, rule.replacement);
    }

    println!("parameter overrides:");
    for (node_glob, params) in &parsed.parameter_overrides {
        for (path, value) in params {
            println!("  {node_glob} {path} = {value:?}");
        }
    }

    println!("parameter files: {:?}", parsed.parameter_files);
    println!("enclave: {}", parsed.enclave);
    println!("stdout disabled: {}", parsed.stdout_disabled);
    println!("rosout disabled: {}", parsed.rosout_disabled);
    println!("unparsed_ros: {:?}", parsed.unparsed_ros);
    println!("unparsed_app: {:?}", parsed.unparsed_app);
}
