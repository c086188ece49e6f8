//! Read-only views: today, backlog, progress and the day clock.

use focus_engine_core::format::fmt_mins;
use focus_engine_core::notify::random_quote;
use serde_json::json;

use crate::common::{open_app, print_json, short, CliResult};

const BAR_WIDTH: usize = 20;

fn bar(pct: u32) -> String {
    let filled = (pct.min(100) as usize * BAR_WIDTH) / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn today(json: bool) -> CliResult {
    let app = open_app()?;
    let view = app.today_view();
    if json {
        return print_json(&view);
    }

    let ring = app.day_ring();
    println!("{}. {}", ring.greeting.text(), view.date.format("%A, %d %B"));
    println!("{}", view.label);
    println!(
        "{}/{} tasks done  [{}] {}%",
        view.done,
        view.total,
        bar(view.completion_pct),
        view.completion_pct
    );
    for task in &view.tasks {
        let mark = if task.is_completed() { "x" } else { " " };
        println!(
            "  [{mark}] {}  {:<8} {:<28} {}",
            short(&task.id),
            task.subject,
            task.topic,
            fmt_mins(task.estimated_minutes.into())
        );
    }
    if !view.subjects.is_empty() {
        println!();
        for s in &view.subjects {
            println!(
                "  {:<8} {:>7} planned  {:>7} left  {}%",
                s.subject,
                fmt_mins(s.planned_minutes),
                fmt_mins(s.remaining_minutes),
                s.progress_pct
            );
        }
    }
    println!();
    println!("\"{}\"", random_quote());
    Ok(())
}

pub fn backlog(json: bool) -> CliResult {
    let app = open_app()?;
    let view = app.backlog_view();
    if json {
        return print_json(&view);
    }
    if view.items.is_empty() {
        println!("Backlog is clear.");
        return Ok(());
    }
    println!(
        "{} task(s), {} total, oldest {} day(s) overdue",
        view.count,
        fmt_mins(view.total_minutes),
        view.days_overdue
    );
    for item in &view.items {
        println!(
            "  {}  {:<8} {:<28} {:>7}  from {} ({})",
            short(&item.task.id),
            item.task.subject,
            item.task.topic,
            fmt_mins(item.task.estimated_minutes.into()),
            item.origin_label,
            item.origin_date
        );
    }
    Ok(())
}

pub fn progress(json: bool) -> CliResult {
    let app = open_app()?;
    let metrics = app.weekly_metrics();
    let distribution = app.subject_distribution();
    if json {
        return print_json(&json!({
            "weekly": metrics,
            "subjects": distribution,
        }));
    }

    println!("{} to {}", metrics.from, metrics.to);
    println!(
        "Consistency {}% ({}/7 days)  Focus {}  Sessions {}  Avg/day {}",
        metrics.consistency_pct,
        metrics.active_days,
        fmt_mins(metrics.total_minutes),
        metrics.session_count,
        fmt_mins(metrics.avg_minutes_per_active_day)
    );
    println!();
    for b in &metrics.bars {
        let marker = if b.is_today { "*" } else { " " };
        println!(
            " {}{} [{}] {}",
            b.weekday,
            marker,
            bar(b.height_pct),
            fmt_mins(b.minutes)
        );
    }
    if !distribution.is_empty() {
        println!();
        for share in &distribution {
            println!(
                "  {:<8} {:>3}%  {}",
                share.subject,
                share.pct,
                fmt_mins(share.seconds / 60)
            );
        }
    }
    Ok(())
}

pub fn clock(json: bool) -> CliResult {
    let app = open_app()?;
    let ring = app.day_ring();
    if json {
        return print_json(&ring);
    }
    println!("{}", ring.greeting.text());
    println!(
        "{} left until {}  [{}] {:.0}%",
        ring.remaining_label(),
        ring.day_end,
        bar((ring.progress * 100.0).round() as u32),
        ring.progress * 100.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_and_clamp() {
        assert_eq!(bar(0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(50).matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(bar(150), "#".repeat(BAR_WIDTH));
    }
}
