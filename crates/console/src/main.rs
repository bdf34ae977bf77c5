use std::io::{self, BufRead, Write};

use anyhow::Context;

use tradeledger_console::{Reply, Session};

fn main() -> anyhow::Result<()> {
    tradeledger_observability::init_with_default("warn");

    let mut session = Session::from_env().context("failed to open trading account")?;
    tracing::info!(
        account_id = %session.ledger().id(),
        owner = session.ledger().owner(),
        unknown_symbols = %session.ledger().config().unknown_symbols,
        profit_baseline = %session.ledger().config().profit_baseline,
        "console session started"
    );

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "Trading account for {} (balance ${:.2}). Type `help` for commands.",
        session.ledger().owner(),
        session.ledger().cash_balance()
    )?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let reply = session.handle_line(&line);
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
        if reply == Reply::Quit {
            break;
        }
    }

    Ok(())
}
