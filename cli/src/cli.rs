#[derive(Debug, clap::Parser)]
#[clap(name = "rcl-args", version, author)]
pub struct Args {
    /// Node name used when resolving names against the parsed remap rules.
    #[clap(long, default_value = "my_node")]
    pub node_name: String,

    /// Node namespace used when resolving names against the parsed remap rules.
    #[clap(long, default_value = "/")]
    pub node_namespace: String,

    /// A topic or service name to resolve against the parsed remap rules,
    /// after parsing and printing the summary.
    #[clap(long)]
    pub resolve_topic: Option<String>,

    /// The argv to parse, exactly as a ROS node would receive it (including
    /// its own argv[0]). Typically everything after a `--`.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub argv: Vec<String>,
}
