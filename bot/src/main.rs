mod cli_opts;
mod pond_cache;
mod sim;

use cli_opts::PondBotOpt;
use pond_cache::ManagedPonds;
use sim::SimLedger;

use lucky_ponds_client::{Clock, PondActions, PondReader, SystemClock};
use lucky_ponds_core::state::{pad_to_32_bytes, PondId};
use lucky_ponds_core::UnixTimestamp;

use env_logger::Env;
use log::{error, info, warn};
use structopt::StructOpt;

use std::sync::Arc;

#[tokio::main]
pub async fn main() {
    let opt = PondBotOpt::from_args();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let clock = Arc::new(SystemClock);
    let ledger = SimLedger::new(
        Arc::clone(&clock),
        opt.timelock
            .unwrap_or_else(|| opt.cadence.default_timelock()),
    );
    for index in 0..opt.pond_count {
        if let Err(e) = ledger.add_pond(&format!("pond-{}", index), opt.cadence) {
            error!("{}", e);
        }
    }

    let focused_id_bytes = if let Some(id) = opt.pond_id {
        Some(pad_to_32_bytes(&id).unwrap())
    } else {
        None
    };

    // FETCH THE TIMELOCK ONCE, IT RARELY CHANGES
    let timelock = match ledger.selection_timelock().await {
        Ok(timelock) => timelock,
        Err(e) => {
            warn!("timelock fetch failed, using the cadence default: {}", e);
            opt.cadence.default_timelock()
        }
    };
    let mut managed_ponds = ManagedPonds::new(timelock);

    loop {
        if let Err(e) = try_main(
            &ledger,
            clock.as_ref(),
            &mut managed_ponds,
            focused_id_bytes,
            opt.tick,
        )
        .await
        {
            error!("{}", e);
        }
    }
}

async fn try_main<C: Clock>(
    ledger: &SimLedger<C>,
    clock: &C,
    managed_ponds: &mut ManagedPonds,
    focused_id_bytes: Option<PondId>,
    tick_seconds: u64,
) -> Result<(), anyhow::Error> {
    // GET CURRENT WALL CLOCK TIME
    let now = clock.now();
    info!("time: {} [s]", now);
    clock.sleep(tick_seconds).await;
    if let Some(id_bytes) = focused_id_bytes {
        try_select_winner(ledger, managed_ponds, id_bytes, now).await;
    } else {
        // READ REGISTERED PONDS
        for pond_id in ledger.pond_ids().await? {
            try_select_winner(ledger, managed_ponds, pond_id, now).await;
        }
    }

    Ok(())
}

async fn try_select_winner<C: Clock>(
    ledger: &SimLedger<C>,
    managed_ponds: &mut ManagedPonds,
    pond_id: PondId,
    now: UnixTimestamp,
) {
    let mut mark_faulty = false;
    match managed_ponds.get_or_insert_pond(ledger, pond_id, now).await {
        Ok(Some(pond_record)) => {
            if let Err(err) = ledger.select_winner(&pond_id).await {
                match pond_record.report_error(ledger, &pond_id, &err).await {
                    Ok(true) => error!(
                        "pond \"{}\" threw error {:?}",
                        String::from_utf8_lossy(&pond_id),
                        err
                    ),
                    Ok(false) => (),
                    Err(update_err) => error!(
                        "pond \"{}\" could not refresh after error {:?}: {}",
                        String::from_utf8_lossy(&pond_id),
                        err,
                        update_err
                    ),
                }
                mark_faulty = pond_record.is_faulty_pond();
            } else {
                pond_record.reset_error_streak();
                info!(
                    "pond \"{}\"    winner selected    time: {} [s]",
                    String::from_utf8_lossy(&pond_id),
                    now
                );
            }
        }
        Ok(None) => (),
        Err(err) => error!(
            "pond \"{}\" threw error {:?}",
            String::from_utf8_lossy(&pond_id),
            err
        ),
    }
    if mark_faulty {
        warn!(
            "pond \"{}\" exceeded the error threshold and is parked",
            String::from_utf8_lossy(&pond_id)
        );
        managed_ponds.error_ponds.insert(pond_id);
    }
}
