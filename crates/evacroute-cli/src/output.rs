//! Rendering of command reports.
//!
//! Every renderer writes to a caller-supplied writer so output can be
//! captured in tests; the binary passes a locked stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use evacroute_lib::{PenalizedRoute, RankedRoutes, RiskLevel, RouteLabel, ScoredRoute};

use crate::commands::hazards::HazardSummary;
use crate::commands::nearest::NearestReport;
use crate::commands::rank::RankReport;
use crate::terminal::{format_distance, format_duration, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

pub fn render_nearest<W: Write>(
    out: &mut W,
    report: &NearestReport,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    let center = &report.evacuation_center;
    writeln!(
        out,
        "Nearest evacuation center: {}{}{} ({})",
        palette.white_bold, center.name, palette.reset, center.id
    )?;
    writeln!(out, "  Distance: {}", format_distance(report.distance_meters))?;
    if let (Some(lat), Some(lng)) = (center.latitude, center.longitude) {
        writeln!(out, "  {}Location: {:.5}, {:.5}{}", palette.gray, lat, lng, palette.reset)?;
    }
    if !center.status.is_empty() {
        writeln!(
            out,
            "  {}Status: {} ({}/{} occupied){}",
            palette.gray, center.status, center.capacity_current, center.capacity_total, palette.reset
        )?;
    }
    Ok(())
}

pub fn render_rank<W: Write>(
    out: &mut W,
    report: &RankReport,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, report);
    }

    let on_off = |active: bool| if active { "on" } else { "off" };
    writeln!(
        out,
        "Ranked {} routes (strategy: {}; flood: {}, earthquake: {}):",
        report.routes.len(),
        report.strategy,
        on_off(report.event_status.flood),
        on_off(report.event_status.earthquake)
    )?;

    match &report.routes {
        RankedRoutes::RiskThenTime(routes) => {
            for (index, route) in routes.iter().enumerate() {
                render_scored(out, index, route, palette)?;
            }
        }
        RankedRoutes::TimePlusPenalty(routes) => {
            for (index, route) in routes.iter().enumerate() {
                render_penalized(out, index, route, palette)?;
            }
        }
    }
    Ok(())
}

fn label_text(label: RouteLabel) -> &'static str {
    match label {
        RouteLabel::SafestAndFastest => "safest & fastest",
        RouteLabel::Safest => "safest",
        RouteLabel::Fastest => "fastest",
        RouteLabel::Alternate => "alternate",
    }
}

fn label_color(label: RouteLabel, palette: ColorPalette) -> &'static str {
    match label {
        RouteLabel::SafestAndFastest | RouteLabel::Safest => palette.green,
        RouteLabel::Fastest => palette.cyan,
        RouteLabel::Alternate => palette.gray,
    }
}

fn risk_text(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "low",
        RiskLevel::Medium => "medium",
        RiskLevel::High => "high",
    }
}

fn risk_color(level: RiskLevel, palette: ColorPalette) -> &'static str {
    match level {
        RiskLevel::Low => palette.green,
        RiskLevel::Medium => palette.yellow,
        RiskLevel::High => palette.red,
    }
}

fn default_marker(is_default: bool) -> &'static str {
    if is_default {
        " *default*"
    } else {
        ""
    }
}

fn render_scored<W: Write>(
    out: &mut W,
    index: usize,
    route: &ScoredRoute,
    palette: ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>2}. {}[{}]{} {}, {} | risk {:.1} {}({}){}{}",
        index + 1,
        label_color(route.label, palette),
        label_text(route.label),
        palette.reset,
        format_duration(route.path.duration_seconds()),
        format_distance(route.path.distance_meters()),
        route.combined_risk,
        risk_color(route.risk_level, palette),
        risk_text(route.risk_level),
        palette.reset,
        default_marker(route.is_default)
    )
}

fn render_penalized<W: Write>(
    out: &mut W,
    index: usize,
    route: &PenalizedRoute,
    palette: ColorPalette,
) -> io::Result<()> {
    let penalty_color = if route.hazard_penalty > 0.0 {
        palette.red
    } else {
        palette.gray
    };
    writeln!(
        out,
        "{:>2}. {}, {} | {}penalty {:.0} s{} | score {:.0}{}",
        index + 1,
        format_duration(route.path.duration_seconds()),
        format_distance(route.path.distance_meters()),
        penalty_color,
        route.hazard_penalty,
        palette.reset,
        route.final_score,
        default_marker(route.is_default)
    )
}

pub fn render_hazards<W: Write>(
    out: &mut W,
    summary: &HazardSummary,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, summary);
    }

    for layer in &summary.layers {
        let noun = if layer.zones == 1 { "zone" } else { "zones" };
        writeln!(
            out,
            "{}{}{}: {} {} ({} skipped)",
            palette.white_bold, layer.kind, palette.reset, layer.zones, noun, layer.skipped
        )?;
        for (severity, count) in &layer.severities {
            writeln!(out, "  {}: {}", severity, count)?;
        }
        for name in &layer.names {
            writeln!(out, "  {}- {}{}", palette.gray, name, palette.reset)?;
        }
    }
    Ok(())
}
