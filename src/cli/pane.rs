//! Text rendering of the panes shown after each command.

use crate::cli::commands::system::overview;
use crate::cli::dispatcher::Pane;
use crate::cli::output::current_preferences;
use crate::cli::registry::CommandRegistry;
use crate::domain::common::format_amount;
use crate::domain::{Expense, Income, Payment, Priority};
use crate::ledger::{Ledger, Projection};

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    fn left(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Left,
        }
    }

    fn right(header: &'static str) -> Self {
        Self {
            header,
            max_width: None,
            alignment: Alignment::Right,
        }
    }

    fn capped(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count();
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                column.max_width.map_or(width, |max| width.min(max))
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let text = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(text, widths[idx], column.alignment)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.to_string()).collect();
        let mut lines = vec![self.render_row(&header, &widths), horizontal_rule(&widths)];
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

fn truncate_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(width - 1).collect();
    truncated.push('…');
    truncated
}

fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(fitted.chars().count());
    match alignment {
        Alignment::Left => format!("{}{}", fitted, " ".repeat(remaining)),
        Alignment::Right => format!("{}{}", " ".repeat(remaining), fitted),
    }
}

fn horizontal_rule(widths: &[usize]) -> String {
    let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
    let ch = if current_preferences().plain_mode { '-' } else { '─' };
    ch.to_string().repeat(total)
}

fn list_footer<T>(projection: &Projection<T>) -> String {
    [
        projection.total_string(),
        projection.filter_string(),
        projection.sort_string(),
        projection.view_string(),
    ]
    .join(" | ")
}

fn render_list<T>(
    title: &str,
    projection: &Projection<T>,
    columns: Vec<TableColumn>,
    row: impl Fn(&T) -> Vec<String>,
) -> String {
    let mut out = format!("== {} ==\n", title);
    if projection.is_empty() {
        out.push_str(&format!("No {} to show.\n", title.to_lowercase()));
    } else {
        let rows = projection
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let mut cells = vec![(idx + 1).to_string()];
                cells.extend(row(item));
                cells
            })
            .collect();
        let mut all_columns = vec![TableColumn::right("#")];
        all_columns.extend(columns);
        out.push_str(&Table { columns: all_columns, rows }.render());
        out.push('\n');
    }
    out.push_str(&list_footer(projection));
    out
}

pub fn expense_pane(projection: &Projection<Expense>) -> String {
    render_list(
        "Expenses",
        projection,
        vec![
            TableColumn::right("Amount"),
            TableColumn::left("Description").capped(32),
            TableColumn::left("Tag").capped(16),
            TableColumn::left("Time"),
            TableColumn::left("Status"),
        ],
        |expense| {
            let mut status = Vec::new();
            if expense.tentative {
                status.push("tentative");
            }
            if expense.recurring {
                status.push("recurring");
            }
            vec![
                format_amount(expense.amount),
                expense.description.clone(),
                expense.tag.clone(),
                expense.time.format("%Y-%m-%d %H:%M").to_string(),
                status.join(", "),
            ]
        },
    )
}

pub fn income_pane(projection: &Projection<Income>) -> String {
    render_list(
        "Incomes",
        projection,
        vec![
            TableColumn::right("Amount"),
            TableColumn::left("Description").capped(32),
            TableColumn::left("Tag").capped(16),
            TableColumn::left("Time"),
            TableColumn::left("Status"),
        ],
        |income| {
            vec![
                format_amount(income.amount),
                income.description.clone(),
                income.tag.clone(),
                income.time.format("%Y-%m-%d %H:%M").to_string(),
                if income.recurring { "recurring" } else { "" }.to_string(),
            ]
        },
    )
}

pub fn payment_pane(projection: &Projection<Payment>) -> String {
    render_list(
        "Payments",
        projection,
        vec![
            TableColumn::right("Amount"),
            TableColumn::left("Description").capped(32),
            TableColumn::left("Due"),
            TableColumn::left("Priority"),
            TableColumn::left("Receiver").capped(20),
            TableColumn::left("Remark").capped(24),
            TableColumn::left("Status"),
        ],
        |payment| {
            vec![
                format_amount(payment.amount),
                payment.description.clone(),
                payment.due.format("%Y-%m-%d %H:%M").to_string(),
                match payment.priority {
                    Priority::None => String::new(),
                    other => other.to_string(),
                },
                payment.receiver.clone(),
                payment.remark.clone(),
                if payment.done { "done" } else { "" }.to_string(),
            ]
        },
    )
}

pub fn budget_pane(ledger: &Ledger) -> String {
    let mut out = String::from("== Budget ==\n");
    let budget = &ledger.budget;
    let spent = ledger.month_spending();
    let mut rows = vec![vec![
        "monthly".to_string(),
        format_amount(budget.monthly),
        format_amount(spent),
        format_amount(budget.remaining(spent)),
    ]];
    rows.extend(budget.tags.iter().map(|(tag, limit)| {
        let tag_spent = ledger.month_tag_spending(tag);
        vec![
            tag.clone(),
            format_amount(*limit),
            format_amount(tag_spent),
            format_amount(*limit - tag_spent),
        ]
    }));
    let table = Table {
        columns: vec![
            TableColumn::left("Budget").capped(20),
            TableColumn::right("Limit"),
            TableColumn::right("Spent"),
            TableColumn::right("Remaining"),
        ],
        rows,
    };
    out.push_str(&table.render());
    out.push('\n');
    out.push_str(&format!(
        "Income this month: {} | Outstanding payments: {}",
        format_amount(ledger.month_income()),
        format_amount(ledger.payments.outstanding_amount())
    ));
    out
}

pub fn help_pane(registry: &CommandRegistry) -> String {
    let rows = overview(registry)
        .into_iter()
        .map(|(name, description)| vec![name.to_string(), description.to_string()])
        .collect();
    let table = Table {
        columns: vec![TableColumn::left("Command"), TableColumn::left("Description")],
        rows,
    };
    format!("== Commands ==\n{}", table.render())
}

pub fn render(pane: Pane, ledger: &Ledger, registry: &CommandRegistry) -> String {
    match pane {
        Pane::Expense => expense_pane(ledger.expenses.published()),
        Pane::Income => income_pane(ledger.incomes.published()),
        Pane::Payment => payment_pane(ledger.payments.published()),
        Pane::Budget => budget_pane(ledger),
        Pane::Help => help_pane(registry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::domain::Budget;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn ledger() -> Ledger {
        let time = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let mut budget = Budget::default();
        budget.set_monthly(Decimal::new(100, 0));
        budget.set_tag("food", Decimal::new(40, 0));
        Ledger::from_parts(
            vec![Expense::new(Decimal::new(1250, 2), "pizza", time).with_tag("food")],
            Vec::new(),
            Vec::new(),
            budget,
            Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap())),
        )
    }

    #[test]
    fn cells_truncate_and_align() {
        assert_eq!(render_cell("abcdef", 4, Alignment::Left), "abc…");
        assert_eq!(render_cell("7", 3, Alignment::Right), "  7");
    }

    #[test]
    fn expense_pane_lists_rows_and_footer() {
        let ledger = ledger();
        let pane = expense_pane(ledger.expenses.published());
        assert!(pane.contains("pizza"));
        assert!(pane.contains("$12.50"));
        assert!(pane.contains("2024-03-10 12:30"));
        assert!(pane.contains("Total: $12.50 | Filter: none | Sort by: Newest | Viewscope: ALL"));
    }

    #[test]
    fn empty_list_says_so() {
        let ledger = ledger();
        assert!(payment_pane(ledger.payments.published()).contains("No payments to show."));
    }

    #[test]
    fn budget_pane_shows_remaining_per_tag() {
        let pane = budget_pane(&ledger());
        assert!(pane.contains("$87.50"));
        assert!(pane.contains("$27.50"));
    }
}
