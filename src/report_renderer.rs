use chrono::NaiveDate;
use std::fmt::{self, Write};

use crate::budget_data_processor::*;
use crate::budget_formatter::*;
use crate::constants::*;
use crate::models::*;
use crate::report_generator::*;
use crate::utilities::*;

const SPENDING_HEADERS: &[&str] = &["Category", "Spent", "Transactions"];
const SPENDING_SHARE_HEADERS: &[&str] = &["Category", "Spent", "Share", "Transactions"];
const USAGE_HEADERS: &[&str] = &["Category", "Budgeted", "Spent", "Balance", "Used"];

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;color:#222;max-width:680px;margin:0 auto;padding:16px}\
h1{font-size:22px;margin-bottom:4px}h2{font-size:17px;margin-top:28px;border-bottom:1px solid #ddd;padding-bottom:4px}\
table{border-collapse:collapse;width:100%}th,td{text-align:left;padding:6px 8px;border-bottom:1px solid #eee}\
th{background:#f6f6f6}td.amount,th.amount{text-align:right}.muted{color:#777}\
.overspent{color:#c0392b}.warning{color:#d68910}.surplus{color:#1e8449}";

#[derive(Debug)]
pub struct RenderedReport {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub struct ReportRenderer<'a> {
    formatter: &'a BudgetFormatter<'a>,
}

struct Section<'b> {
    title: String,
    class: &'b str,
    headers: &'b [&'b str],
    rows: Vec<Vec<String>>,
    empty_message: &'b str,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(formatter: &'a BudgetFormatter<'a>) -> ReportRenderer<'a> {
        ReportRenderer { formatter }
    }

    pub fn render_daily_alert(&self, alert: &DailyAlert) -> RenderedReport {
        let mut summary = vec![(
            "Uncategorized transactions".to_string(),
            alert.uncategorized_transactions.len().to_string(),
        )];
        if let Some(ready_to_assign) = alert.ready_to_assign {
            summary.push((
                "Ready to assign".to_string(),
                self.formatter.format_milliunits(ready_to_assign),
            ));
        }
        let mut sections = vec![Section {
            title: format!(
                "Uncategorized transactions ({})",
                alert.uncategorized_transactions.len()
            ),
            class: "warning",
            headers: &["Date", "Payee", "Account", "Memo", "Amount"],
            rows: alert
                .uncategorized_transactions
                .iter()
                .map(|t| {
                    vec![
                        self.formatter.format_date(t.date),
                        t.payee_name.clone().unwrap_or_default(),
                        t.account_name.clone().unwrap_or_default(),
                        t.memo.clone().unwrap_or_default(),
                        self.formatter.format_milliunits(t.amount),
                    ]
                })
                .collect(),
            empty_message: "All recent transactions are categorized.",
        }];
        sections.extend(self.category_status_sections(
            &alert.category_status,
            alert.threshold_percent,
            true,
        ));
        RenderedReport {
            subject: format!("Daily Budget Alert - {}", long_date(alert.date)),
            html: self.html_document(
                "Daily Budget Alert",
                &alert.date.format("%A, %B %d, %Y").to_string(),
                &summary,
                &sections,
            ),
            text: self.text_document(
                "Daily Budget Alert",
                &alert.date.format("%A, %B %d, %Y").to_string(),
                &summary,
                &sections,
            ),
        }
    }

    pub fn render_weekly_recap(&self, recap: &WeeklyRecap) -> RenderedReport {
        let period = format!(
            "{} - {}",
            recap.week_start.format("%B %d"),
            long_date(recap.week_end)
        );
        let summary = vec![
            (
                "Total spent".to_string(),
                self.formatter.format_milliunits(recap.total_spent),
            ),
            (
                "Transactions".to_string(),
                recap.transaction_count.to_string(),
            ),
        ];
        let mut sections = vec![
            self.category_spending_section(
                recap
                    .category_spending
                    .iter()
                    .map(|spending| (spending, None))
                    .collect(),
                false,
            ),
            self.scheduled_section(
                format!("Upcoming scheduled ({} days)", WEEKLY_UPCOMING_DAYS_AHEAD),
                &recap.upcoming_scheduled,
                "Nothing scheduled in the next two weeks.",
            ),
        ];
        sections.extend(self.category_status_sections(
            &recap.category_status,
            recap.threshold_percent,
            false,
        ));
        RenderedReport {
            subject: format!("Weekly Budget Recap - {}", long_date(recap.week_end)),
            html: self.html_document("Weekly Budget Recap", &period, &summary, &sections),
            text: self.text_document("Weekly Budget Recap", &period, &summary, &sections),
        }
    }

    pub fn render_monthly_recap(&self, recap: &MonthlyRecap) -> RenderedReport {
        let month_name = month_name(recap.month);
        let summary = vec![
            (
                "Total spent".to_string(),
                self.formatter.format_milliunits(recap.total_spent),
            ),
            (
                "Transactions".to_string(),
                recap.transaction_count.to_string(),
            ),
            (
                "Average per day".to_string(),
                self.formatter.format_milliunits(recap.average_per_day),
            ),
            (
                "Average per transaction".to_string(),
                self.formatter.format_milliunits(recap.average_per_transaction),
            ),
            (
                "Largest transaction".to_string(),
                self.formatter.format_milliunits(recap.largest_transaction),
            ),
            (
                "Most active day".to_string(),
                recap
                    .most_active_day
                    .map(weekday_name)
                    .unwrap_or("N/A")
                    .to_string(),
            ),
            (
                "Categories used".to_string(),
                recap.categories_used.to_string(),
            ),
        ];
        let sections = vec![
            self.category_spending_section(
                recap
                    .top_categories
                    .iter()
                    .map(|share| (&share.spending, Some(share.percentage)))
                    .collect(),
                true,
            ),
            self.scheduled_section(
                "Recurring this month".to_string(),
                &recap.recurring_this_month,
                "No recurring transactions are scheduled this month.",
            ),
        ];
        RenderedReport {
            subject: format!("Monthly Budget Report - {}", month_name),
            html: self.html_document("Monthly Budget Report", &month_name, &summary, &sections),
            text: self.text_document("Monthly Budget Report", &month_name, &summary, &sections),
        }
    }

    fn category_spending_section(
        &self,
        spending: Vec<(&CategorySpending, Option<f64>)>,
        with_share: bool,
    ) -> Section<'static> {
        let rows = spending
            .into_iter()
            .map(|(category, share)| {
                let mut row = vec![
                    category.name.clone(),
                    self.formatter.format_milliunits(category.total),
                ];
                if let Some(share) = share {
                    row.push(self.formatter.format_percent(share));
                }
                row.push(category.count.to_string());
                row
            })
            .collect();
        Section {
            title: "Spending by category".to_string(),
            class: "",
            headers: if with_share {
                SPENDING_SHARE_HEADERS
            } else {
                SPENDING_HEADERS
            },
            rows,
            empty_message: "No spending recorded.",
        }
    }

    fn scheduled_section<'b>(
        &self,
        title: String,
        scheduled: &[ScheduledTransactionDetail],
        empty_message: &'b str,
    ) -> Section<'b> {
        Section {
            title,
            class: "",
            headers: &["Date", "Payee", "Category", "Frequency", "Amount"],
            rows: scheduled
                .iter()
                .map(|st| {
                    vec![
                        st.date_next
                            .map(|date| self.formatter.format_date(date))
                            .unwrap_or_default(),
                        st.payee_name.clone().unwrap_or_default(),
                        st.category_name.clone().unwrap_or_default(),
                        st.frequency.description().to_string(),
                        self.formatter.format_milliunits(st.amount),
                    ]
                })
                .collect(),
            empty_message,
        }
    }

    fn category_status_sections(
        &self,
        status: &CategoryStatus,
        threshold_percent: u32,
        include_surplus: bool,
    ) -> Vec<Section<'static>> {
        let usage_rows = |usages: &[CategoryUsage]| -> Vec<Vec<String>> {
            usages
                .iter()
                .map(|usage| {
                    vec![
                        usage.name.clone(),
                        self.formatter.format_milliunits(usage.budgeted),
                        self.formatter.format_milliunits(usage.activity),
                        self.formatter.format_milliunits(usage.balance),
                        self.formatter.format_percent(usage.percent_used),
                    ]
                })
                .collect()
        };
        let mut sections = vec![
            Section {
                title: format!("Overspent categories ({})", status.overspent.len()),
                class: "overspent",
                headers: USAGE_HEADERS,
                rows: usage_rows(&status.overspent),
                empty_message: "No categories are overspent.",
            },
            Section {
                title: format!(
                    "Near limit: {}% or more used ({})",
                    threshold_percent,
                    status.warning.len()
                ),
                class: "warning",
                headers: USAGE_HEADERS,
                rows: usage_rows(&status.warning),
                empty_message: "No categories are close to their limit.",
            },
        ];
        if include_surplus && !status.surplus.is_empty() {
            sections.push(Section {
                title: format!(
                    "Holding more than {}x their assignment ({})",
                    SURPLUS_BUDGETED_MULTIPLE,
                    status.surplus.len()
                ),
                class: "surplus",
                headers: USAGE_HEADERS,
                rows: usage_rows(&status.surplus),
                empty_message: "",
            });
        }
        sections
    }

    fn html_document(
        &self,
        title: &str,
        subtitle: &str,
        summary: &[(String, String)],
        sections: &[Section],
    ) -> String {
        let mut out = String::new();
        write_html_document(&mut out, title, subtitle, summary, sections)
            .expect("Writing HTML to a String should not fail");
        out
    }

    fn text_document(
        &self,
        title: &str,
        subtitle: &str,
        summary: &[(String, String)],
        sections: &[Section],
    ) -> String {
        let mut out = String::new();
        write_text_document(&mut out, title, subtitle, summary, sections)
            .expect("Writing text to a String should not fail");
        out
    }
}

fn write_html_document(
    out: &mut String,
    title: &str,
    subtitle: &str,
    summary: &[(String, String)],
    sections: &[Section],
) -> fmt::Result {
    write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n",
        title = escape_html(title),
        style = STYLE
    )?;
    writeln!(out, "<h1>{}</h1>", escape_html(title))?;
    writeln!(out, "<p class=\"muted\">{}</p>", escape_html(subtitle))?;
    writeln!(out, "<table>")?;
    for (label, value) in summary {
        writeln!(
            out,
            "<tr><th>{}</th><td class=\"amount\">{}</td></tr>",
            escape_html(label),
            escape_html(value)
        )?;
    }
    writeln!(out, "</table>")?;
    for section in sections {
        if section.class.is_empty() {
            writeln!(out, "<h2>{}</h2>", escape_html(&section.title))?;
        } else {
            writeln!(
                out,
                "<h2 class=\"{}\">{}</h2>",
                section.class,
                escape_html(&section.title)
            )?;
        }
        if section.rows.is_empty() {
            writeln!(
                out,
                "<p class=\"muted\">{}</p>",
                escape_html(section.empty_message)
            )?;
            continue;
        }
        write!(out, "<table>\n<tr>")?;
        let last_column = section.headers.len().saturating_sub(1);
        for (index, header) in section.headers.iter().enumerate() {
            write!(out, "<th{}>{}</th>", amount_class(index, last_column), escape_html(header))?;
        }
        writeln!(out, "</tr>")?;
        for row in &section.rows {
            write!(out, "<tr>")?;
            for (index, cell) in row.iter().enumerate() {
                write!(out, "<td{}>{}</td>", amount_class(index, last_column), escape_html(cell))?;
            }
            writeln!(out, "</tr>")?;
        }
        writeln!(out, "</table>")?;
    }
    write!(
        out,
        "<p class=\"muted\">Generated from your YNAB budget.</p>\n</body>\n</html>\n"
    )
}

fn amount_class(index: usize, last_column: usize) -> &'static str {
    if index > 0 && index == last_column {
        " class=\"amount\""
    } else {
        ""
    }
}

fn write_text_document(
    out: &mut String,
    title: &str,
    subtitle: &str,
    summary: &[(String, String)],
    sections: &[Section],
) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", subtitle)?;
    writeln!(out)?;
    for (label, value) in summary {
        writeln!(out, "{}: {}", label, value)?;
    }
    for section in sections {
        writeln!(out)?;
        writeln!(out, "{}", section.title)?;
        if section.rows.is_empty() {
            writeln!(out, "  {}", section.empty_message)?;
            continue;
        }
        for row in &section.rows {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| if cell.is_empty() { "-" } else { cell.as_str() })
                .collect();
            writeln!(out, "  - {}", cells.join(" | "))?;
        }
    }
    Ok(())
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

fn month_name(month: NaiveDate) -> String {
    first_of_month(month).format("%B %Y").to_string()
}
