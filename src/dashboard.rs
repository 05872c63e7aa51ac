use std::collections::HashSet;

use serde::Serialize;

use crate::mock::{self, Activity};
use crate::schedule::{Booking, BookingStatus, PaymentStatus, ScheduleGrid};
use crate::table::format_price;

const PEAK_HOURS: &str = "17:00 - 22:00";

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
}

pub fn nav_items() -> Vec<NavItem> {
    vec![
        NavItem { title: "Dashboard", url: "/" },
        NavItem { title: "Rezervacije", url: "/bookings" },
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub description: String,
}

/// Figures for one day's stat cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub bookings: usize,
    pub pending: usize,
    pub revenue: u32,
    pub outstanding: u32,
    pub occupancy_percent: u32,
    pub active_players: usize,
}

impl DashboardSummary {
    pub fn compute(bookings: &[Booking], grid: &ScheduleGrid) -> Self {
        let active: Vec<&Booking> = bookings.iter().filter(|b| b.blocks_court()).collect();

        let revenue = active
            .iter()
            .filter(|b| b.payment_status == PaymentStatus::Paid)
            .map(|b| b.total_price)
            .sum();
        let outstanding = active
            .iter()
            .filter(|b| b.payment_status == PaymentStatus::Unpaid)
            .map(|b| b.total_price)
            .sum();

        let booked_columns = grid.booked_columns();
        let total_columns = grid.total_columns();
        let occupancy_percent = if total_columns == 0 {
            0
        } else {
            ((booked_columns * 100 + total_columns / 2) / total_columns) as u32
        };

        let players: HashSet<&str> = active.iter().map(|b| b.player.as_str()).collect();

        Self {
            bookings: active.len(),
            pending: active.iter().filter(|b| b.status == BookingStatus::Pending).count(),
            revenue,
            outstanding,
            occupancy_percent,
            active_players: players.len(),
        }
    }

    pub fn cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Današnje Rezervacije",
                value: self.bookings.to_string(),
                description: format!("Na čekanju: {}", self.pending),
            },
            StatCard {
                title: "Današnji Prihod",
                value: format_price(self.revenue),
                description: format!("Neplaćeno: {}", format_price(self.outstanding)),
            },
            StatCard {
                title: "Popunjenost Terena",
                value: format!("{}%", self.occupancy_percent),
                description: format!("Vršno vreme: {}", PEAK_HOURS),
            },
            StatCard {
                title: "Aktivni Igrači",
                value: self.active_players.to_string(),
                description: format!("Termina danas: {}", self.bookings),
            },
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub date: String,
    pub summary: DashboardSummary,
    pub cards: Vec<StatCard>,
    pub activity: Vec<Activity>,
    pub nav: Vec<NavItem>,
}

impl DashboardView {
    pub fn build(date_label: String, bookings: &[Booking], grid: &ScheduleGrid) -> Self {
        let summary = DashboardSummary::compute(bookings, grid);
        Self {
            date: date_label,
            cards: summary.cards(),
            summary,
            activity: mock::recent_activity(),
            nav: nav_items(),
        }
    }
}
