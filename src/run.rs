use std::str::FromStr;

use anyhow::Result;
use chrono::Datelike;
use rust_decimal::Decimal;

use crate::events::{Change, ChangeBus};
use crate::ledger::Ledger;
use crate::models::{Category, Kind, Transaction};

pub(crate) fn as_cli(args: &[String], ledger: &Ledger) -> Result<()> {
    // Stand-in for the GUI tabs refreshing after a mutation: subscribed views
    // re-render whatever depends on the published change.
    let mut bus = ChangeBus::new();
    bus.subscribe(|change| {
        let refreshed = match change {
            Change::Categories => print_categories(ledger),
            Change::Transactions => print_recent(ledger, 10),
        };
        if let Err(e) = refreshed {
            eprintln!("Failed to refresh view: {e}");
        }
    });

    match args[1].as_str() {
        "categories" => print_categories(ledger),
        "add-category" => cli_add_category(&args[2..], ledger, &bus),
        "edit-category" => cli_edit_category(&args[2..], ledger, &bus),
        "delete-category" => cli_delete_category(&args[2..], ledger, &bus),
        "stats" => cli_stats(&args[2..], ledger),
        "add" => cli_add_transaction(&args[2..], ledger, &bus),
        "recent" => cli_recent(&args[2..], ledger),
        "transactions" => cli_transactions(&args[2..], ledger),
        "summary" | "s" => cli_summary(&args[2..], ledger),
        "chart" => cli_chart(&args[2..], ledger),
        "export" => cli_export(&args[2..], ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("fintrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("fintrack — local-only personal income/expense ledger");
    println!();
    println!("Usage: fintrack <command>");
    println!();
    println!("Commands:");
    println!("  categories                           List all categories");
    println!("  add-category <name> <kind>           Add a category (kind: income|expense)");
    println!("  edit-category <name>                 Rename and/or retype a category");
    println!("    --name <new-name>  --kind <kind>");
    println!("  delete-category <name> [--force]     Delete a category (--force removes its transactions)");
    println!("  stats <name>                         Per-category statistics");
    println!("  add <date> <category> <amount> <kind> [description]");
    println!("                                       Record a transaction (date: YYYY-MM-DD)");
    println!("  recent [limit]                       Most recent transactions (default 20)");
    println!("  transactions [YYYY-MM-DD]            All transactions, or those on one date");
    println!("  summary [YYYY-MM]                    Monthly report (default: current month)");
    println!("  chart [YYYY-MM]                      Per-category shares for a month");
    println!("  export [YYYY-MM] [--out <file>]      Export a month to CSV");
    println!("  --help, -h                           Show this help");
    println!("  --version, -V                        Show version");
}

// ── Category commands ────────────────────────────────────────

fn cli_add_category(args: &[String], ledger: &Ledger, bus: &ChangeBus<'_>) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: fintrack add-category <name> <income|expense>");
    }
    let name = &args[0];
    let kind = parse_kind_label(&args[1])?;

    if ledger.add_category(name, kind)? {
        println!("Added category '{name}'");
        bus.publish(Change::Categories);
    } else {
        println!("Category '{name}' already exists");
    }
    Ok(())
}

fn cli_edit_category(args: &[String], ledger: &Ledger, bus: &ChangeBus<'_>) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: fintrack edit-category <name> [--name <new-name>] [--kind <kind>]");
    }
    let old_name = &args[0];
    let new_name = args
        .windows(2)
        .find(|w| w[0] == "--name")
        .map(|w| w[1].as_str());
    let new_kind = match args.windows(2).find(|w| w[0] == "--kind") {
        Some(w) => Some(parse_kind_label(&w[1])?),
        None => None,
    };

    if ledger.edit_category(old_name, new_name, new_kind)? {
        println!("Updated category '{old_name}'");
        bus.publish(Change::Categories);
    } else if ledger.get_category_stats(old_name)?.is_none() {
        println!("Category '{old_name}' not found");
    } else {
        println!(
            "Category '{}' already exists",
            new_name.unwrap_or(old_name)
        );
    }
    Ok(())
}

fn cli_delete_category(args: &[String], ledger: &Ledger, bus: &ChangeBus<'_>) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: fintrack delete-category <name> [--force]");
    }
    let name = &args[0];
    let force = args.iter().any(|a| a == "--force");

    if ledger.delete_category(name, force) {
        println!("Deleted category '{name}'");
        bus.publish(Change::Categories);
        if force {
            bus.publish(Change::Transactions);
        }
        return Ok(());
    }

    match ledger.get_category_stats(name)? {
        None => println!("Category '{name}' not found"),
        Some(stats) if stats.count > 0 && !force => println!(
            "Category '{name}' has {} dependent transactions; pass --force to delete them too",
            stats.count
        ),
        Some(_) => println!("Could not delete category '{name}'"),
    }
    Ok(())
}

fn cli_stats(args: &[String], ledger: &Ledger) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: fintrack stats <name>");
    }
    let name = &args[0];
    let Some(stats) = ledger.get_category_stats(name)? else {
        println!("Category '{name}' not found");
        return Ok(());
    };

    println!("{name} ({})", kind_label(stats.kind));
    println!("  Transactions: {}", stats.count);
    println!("  Total:        {:.2}", stats.total);
    match stats.last_transaction {
        Some(t) => println!("  Last:         {} {:.2} {}", t.date, t.amount, t.description),
        None => println!("  Last:         (none)"),
    }
    Ok(())
}

// ── Transaction commands ─────────────────────────────────────

fn cli_add_transaction(args: &[String], ledger: &Ledger, bus: &ChangeBus<'_>) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!("Usage: fintrack add <date> <category> <amount> <kind> [description]");
    }
    let date = &args[0];
    let category = &args[1];
    let amount = Decimal::from_str(&args[2])
        .map_err(|_| anyhow::anyhow!("'{}' is not a number", args[2]))?;
    let kind = parse_kind_label(&args[3])?;
    let description = args[4..].join(" ");

    if ledger.add_transaction(date, category, amount, &description, kind)? {
        println!("Recorded {} {:.2} under '{category}'", kind_label(kind), amount);
        bus.publish(Change::Transactions);
        return Ok(());
    }

    // Name the reason, the way the GUI dialogs would
    if amount <= Decimal::ZERO {
        println!("Amount must be positive");
        return Ok(());
    }
    let categories = ledger.get_all_categories()?;
    match Category::find_by_name(&categories, category) {
        None => println!("Category '{category}' not found"),
        Some(c) if c.kind != kind => println!(
            "Category '{category}' is {}, not {}",
            kind_label(c.kind),
            kind_label(kind)
        ),
        Some(_) => println!("Invalid date '{date}'; expected YYYY-MM-DD"),
    }
    Ok(())
}

fn cli_recent(args: &[String], ledger: &Ledger) -> Result<()> {
    let limit = match args.first() {
        Some(a) => a
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("'{a}' is not a number"))?,
        None => 20,
    };
    print_recent(ledger, limit)
}

fn cli_transactions(args: &[String], ledger: &Ledger) -> Result<()> {
    let txns = match args.first() {
        Some(date) => ledger.get_transactions_by_date(date)?,
        None => ledger.get_all_transactions()?,
    };
    if txns.is_empty() {
        println!("No transactions");
    } else {
        print_transactions(&txns);
    }
    Ok(())
}

fn cli_summary(args: &[String], ledger: &Ledger) -> Result<()> {
    let (year, month) = month_arg(args.first())?;
    let summary = ledger.get_month_summary(year, month)?;

    println!("fintrack — {}", summary.month);
    println!("{}", "─".repeat(40));
    println!("  Income:   {:.2}", summary.total_income);
    println!("  Expenses: {:.2}", summary.total_expense);
    println!("  Balance:  {:.2}", summary.balance);

    if !summary.income_by_category.is_empty() {
        println!();
        println!("Income by category:");
        for (name, amount) in &summary.income_by_category {
            println!("  {name:<24} {amount:>10.2}");
        }
    }
    if !summary.expenses_by_category.is_empty() {
        println!();
        println!("Expenses by category:");
        for (name, amount) in &summary.expenses_by_category {
            println!("  {name:<24} {amount:>10.2}");
        }
    }
    if !summary.recent_transactions.is_empty() {
        println!();
        println!("Recent transactions:");
        print_transactions(&summary.recent_transactions);
    }
    Ok(())
}

fn cli_chart(args: &[String], ledger: &Ledger) -> Result<()> {
    let (year, month) = month_arg(args.first())?;
    let chart = ledger.get_category_data_for_charts(year, month)?;

    println!("fintrack — {year}-{month:02}");
    print_breakdown("Income", &chart.income_data, chart.total_income);
    print_breakdown("Expenses", &chart.expense_data, chart.total_expense);
    println!();
    println!("Balance: {:.2}", chart.balance);
    Ok(())
}

fn cli_export(args: &[String], ledger: &Ledger) -> Result<()> {
    let month = args.first().filter(|a| !a.starts_with('-'));
    let (year, month) = month_arg(month)?;
    let out = args
        .windows(2)
        .find(|w| w[0] == "--out")
        .map(|w| w[1].as_str());

    let filename = ledger.export_to_csv(year, month, out)?;
    println!("Exported {year}-{month:02} to {filename}");
    Ok(())
}

// ── Rendering helpers ────────────────────────────────────────

/// Display labels for kinds. The storage layer only ever sees the canonical
/// strings from `Kind::as_str`.
fn kind_label(kind: Kind) -> &'static str {
    match kind {
        Kind::Income => "Income",
        Kind::Expense => "Expense",
    }
}

fn parse_kind_label(s: &str) -> Result<Kind> {
    Kind::parse(s).ok_or_else(|| {
        let known: Vec<_> = Kind::all().iter().map(Kind::as_str).collect();
        anyhow::anyhow!("Unknown kind '{s}'; expected one of: {}", known.join(", "))
    })
}

fn month_arg(arg: Option<&String>) -> Result<(i32, u32)> {
    match arg {
        Some(s) => {
            let parsed = s
                .split_once('-')
                .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)));
            parsed.ok_or_else(|| anyhow::anyhow!("'{s}' is not a YYYY-MM month"))
        }
        None => {
            let now = chrono::Local::now();
            Ok((now.year(), now.month()))
        }
    }
}

fn print_categories(ledger: &Ledger) -> Result<()> {
    let categories = ledger.get_all_categories()?;
    println!("{:<24} Kind", "Name");
    println!("{}", "─".repeat(32));
    for c in &categories {
        println!("{:<24} {}", c.name, kind_label(c.kind));
    }
    Ok(())
}

fn print_recent(ledger: &Ledger, limit: u32) -> Result<()> {
    let txns = ledger.get_recent_transactions(limit)?;
    if txns.is_empty() {
        println!("No transactions");
    } else {
        print_transactions(&txns);
    }
    Ok(())
}

fn print_transactions(txns: &[Transaction]) {
    println!(
        "{:<12} {:<20} {:>11} {:<8} Description",
        "Date", "Category", "Amount", "Kind"
    );
    println!("{}", "─".repeat(64));
    for t in txns {
        let sign = if t.is_income() { '+' } else { '-' };
        let amount = format!("{sign}{:.2}", t.amount);
        println!(
            "{:<12} {:<20} {amount:>11} {:<8} {}",
            t.date,
            t.category,
            kind_label(t.kind),
            t.description
        );
    }
}

fn print_breakdown(title: &str, data: &[(String, Decimal)], total: Decimal) {
    println!();
    if data.is_empty() {
        println!("{title}: no data");
        return;
    }
    println!("{title} ({total:.2}):");
    for (name, amount) in data {
        let share = if total > Decimal::ZERO {
            amount / total * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        println!("  {name:<24} {amount:>10.2}  {share:>5.1}%");
    }
}
