//! Text rendering of command views.

use std::fmt::Write;

use fare_core::{Balance, Money, PassengerStatus, TripStatus, TripSummary, TripTotals};

use crate::commands::passenger::PassengerView;
use crate::commands::trip::TripView;
use crate::state::ConfigState;

pub const HELP: &str = "\
Trip
  start <fare>        start a new trip (fares: see 'fares')
  end                 end the trip and show the summary (end! skips the prompt)
  new                 discard the trip and go back to setup (new! skips the prompt)
Passengers (<n> is the passenger number)
  add                 add the next passenger
  pay <n> <amount>    add a payment
  quick <n> [1|2|3]   pay the exact fare (1), 50 (2) or 100 (3)
  return <n>          mark change as handed back
  reset <n>           clear a mis-entered payment
  remove <n>          remove a passenger
  list                show passengers, newest first
Reports
  totals              running totals
  summary             end-of-trip report
Other
  help, quit";

pub fn trip(view: &TripView, config: &ConfigState) -> String {
    match view.status {
        TripStatus::Start => "No trip running. Use 'start <fare>' to begin.".to_string(),
        TripStatus::Active => format!(
            "Trip active since {}: fare {}, {} passenger(s), {} collected.",
            view.started_at.as_deref().unwrap_or("?"),
            config.format_amount(view.fare),
            view.totals.passenger_count,
            config.format_amount(view.totals.total_collected),
        ),
        TripStatus::Summary => format!(
            "Trip ended: fare {}, {} passenger(s). Use 'summary' to review or 'new' to start over.",
            config.format_amount(view.fare),
            view.totals.passenger_count,
        ),
    }
}

pub fn fares(fares: &[Money]) -> String {
    let list: Vec<String> = fares.iter().map(Money::to_string).collect();
    format!("Common fares: {}", list.join(" "))
}

pub fn passenger(view: &PassengerView, config: &ConfigState) -> String {
    let badge = match view.status {
        PassengerStatus::Due(amount) => format!("due {}", config.format_amount(amount)),
        PassengerStatus::Paid => "paid".to_string(),
        PassengerStatus::ChangePending(amount) => {
            format!("CHANGE {} to return", config.format_amount(amount))
        }
        PassengerStatus::ChangeReturned => "change returned".to_string(),
    };
    format!(
        "#{:<3} paid {:>10}   {}",
        view.number,
        config.format_amount(view.paid_amount),
        badge
    )
}

pub fn passengers(views: &[PassengerView], config: &ConfigState) -> String {
    if views.is_empty() {
        return "No passengers yet.".to_string();
    }
    views
        .iter()
        .map(|v| passenger(v, config))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn totals(totals: &TripTotals, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Passengers        {} ({} paid)",
        totals.passenger_count, totals.passengers_paid_count
    );
    let _ = writeln!(out, "Collected         {}", config.format_amount(totals.total_collected));
    let _ = writeln!(out, "Change to return  {}", config.format_amount(totals.total_change_due));
    let _ = write!(out, "Net cash in hand  {}", config.format_amount(totals.net_cash_in_hand));
    out
}

pub fn summary(summary: &TripSummary, config: &ConfigState) -> String {
    let t = &summary.totals;
    let verdict = match summary.balance {
        Balance::Balanced => "BALANCED".to_string(),
        Balance::Surplus(amount) => format!(
            "SURPLUS of {} (change not logged as returned?)",
            config.format_amount(amount)
        ),
        Balance::Shortfall(amount) => format!(
            "SHORTFALL of {} (underpayment or extra change?)",
            config.format_amount(amount)
        ),
    };

    let mut out = String::new();
    let _ = writeln!(out, "== Trip summary ==");
    let _ = writeln!(out, "Duration             {} min", summary.duration_minutes);
    let _ = writeln!(
        out,
        "Passengers           {} ({} paid in full)",
        t.passenger_count, t.passengers_paid_count
    );
    let _ = writeln!(out, "Total collected      {}", config.format_amount(t.total_collected));
    let _ = writeln!(out, "Change returned      {}", config.format_amount(t.total_change_returned));
    let _ = writeln!(out, "Net cash in hand     {}", config.format_amount(t.net_cash_in_hand));
    let _ = writeln!(
        out,
        "Expected revenue     {} ({} x {})",
        config.format_amount(t.theoretical_revenue),
        t.passenger_count,
        summary.fare
    );
    let _ = write!(out, "Result               {}", verdict);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_badges() {
        let config = ConfigState::default();
        let view = |paid: i64, status| PassengerView {
            number: 4,
            id: "x".to_string(),
            paid_amount: Money::from_units(paid),
            status,
        };

        let line = passenger(&view(50, PassengerStatus::ChangePending(Money::from_units(35))), &config);
        assert!(line.starts_with("#4"));
        assert!(line.contains("CHANGE 35 Br to return"));

        let line = passenger(&view(10, PassengerStatus::Due(Money::from_units(5))), &config);
        assert!(line.contains("due 5 Br"));
    }

    #[test]
    fn test_fares_line() {
        assert_eq!(
            fares(&[Money::from_units(10), Money::from_units(15)]),
            "Common fares: 10 15"
        );
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(passengers(&[], &ConfigState::default()), "No passengers yet.");
    }
}
