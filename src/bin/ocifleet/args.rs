use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "ocifleet",
    about = "Launch, scale and tear down OCI compute instances, pools and capacity reservations"
)]
pub struct CliArgs {
    /// YAML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.yaml")]
    pub config: PathBuf,
    /// Log level, overrides the configuration file (RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Standalone instances launched and terminated in parallel
    Instances(InstancesArgs),
    /// Instance pools
    Pool(PoolArgs),
    /// Compute capacity reservations
    Capacity(CapacityArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InstancesAction {
    Create,
    Terminate,
}

#[derive(Args, Debug)]
pub struct InstancesArgs {
    #[arg(long, value_enum, default_value_t = InstancesAction::Create)]
    pub action: InstancesAction,
    /// Number of instances to launch
    #[arg(long)]
    pub count: Option<u32>,
    /// Display name prefix; instances are named `{prefix}-{n}`
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub compartment: Option<String>,
    /// Maximum number of operations in flight
    #[arg(long, default_value_t = 10)]
    pub parallel: usize,
    /// Where created instance ids are written
    #[arg(long, default_value = "instances.txt")]
    pub output: PathBuf,
    /// Instance id file read by terminate
    #[arg(long, default_value = "instances.txt")]
    pub file: PathBuf,
    /// Delay between successive terminate requests
    #[arg(long, default_value_t = 1500)]
    pub stagger_ms: u64,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PoolAction {
    Create,
    Scale,
    Terminate,
    Delete,
    List,
}

#[derive(Args, Debug)]
pub struct PoolArgs {
    #[arg(long, value_enum, default_value_t = PoolAction::Create)]
    pub action: PoolAction,
    /// Pool size, overrides `instance_pool.size`
    #[arg(long)]
    pub count: Option<u32>,
    #[arg(long)]
    pub compartment: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub pool_id: Option<String>,
    /// Instance to detach for `--action delete`
    #[arg(long)]
    pub instance_id: Option<String>,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CapacityAction {
    Create,
    Delete,
    List,
    Prescale,
}

#[derive(Args, Debug)]
pub struct CapacityArgs {
    #[arg(long, value_enum, default_value_t = CapacityAction::List)]
    pub action: CapacityAction,
    #[arg(long, default_value = "my-capacity-reservation")]
    pub name: String,
    /// Availability domain of a new reservation
    #[arg(long)]
    pub ad: Option<String>,
    #[arg(long, default_value = "VM.Standard.E4.Flex")]
    pub shape: String,
    #[arg(long, default_value_t = 10)]
    pub count: u64,
    #[arg(long, default_value_t = 1.0)]
    pub ocpus: f32,
    /// Memory in GB for flexible shapes
    #[arg(long, default_value_t = 6.0)]
    pub memory: f32,
    /// Reservation id for `--action delete`
    #[arg(long)]
    pub id: Option<String>,
    /// Concurrent reservations updated by prescale
    #[arg(long, default_value_t = 10)]
    pub parallel: usize,
}
