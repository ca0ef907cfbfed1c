use lucky_ponds_core::state::Cadence;
use lucky_ponds_core::UnixTimestamp;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Configure the simulated pond ledger the bot watches")]
pub struct PondBotOpt {
    #[structopt(
        long,
        short = "-n",
        default_value = "4",
        help("Number of simulated ponds")
    )]
    pub pond_count: u32,
    #[structopt(
        long,
        short = "-c",
        default_value = "five-min",
        help("Cadence of the simulated ponds")
    )]
    pub cadence: Cadence,
    #[structopt(long, help("Winner selection timelock override in seconds"))]
    pub timelock: Option<UnixTimestamp>,
    #[structopt(long, default_value = "5", help("Seconds between bot passes"))]
    pub tick: u64,
    #[structopt(long, help("Pond to focus on (optional)"))]
    pub pond_id: Option<String>,
}
