use clap::Parser;

/// Approve the current revision of all pages that do not yet have an approved revision.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "wikiapprove-sweep", version)]
pub struct SweepCli {
    /// Approve the latest version, even if an earlier revision of the page has already been approved.
    #[arg(long)]
    pub force: bool,

    /// Only approve pages from these pipe-separated namespace names or indexes.
    #[arg(long, value_name = "NS|NS|...")]
    pub namespaces: Option<String>,

    /// Account recorded as the approver; overrides SWEEP_APPROVER.
    #[arg(long, value_name = "USER")]
    pub approver: Option<String>,

    /// Pages fetched per enumeration batch; overrides SWEEP_BATCH_SIZE.
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,
}
