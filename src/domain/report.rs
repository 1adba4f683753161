//! Report rendering.
//!
//! Pure string building over domain types, Telegram-flavored markdown, no
//! transport coupling. Prices follow the IDX convention of dot-separated
//! thousands with no decimals; moving averages keep two decimals.

use crate::domain::classifier::diagnostic::Diagnostic;
use crate::domain::scanner::ScanReport;
use crate::domain::settings::Thresholds;
use crate::domain::signal::{Signal, SignalDetails, SignalKind};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━━";
const DISCLAIMER: &str =
    "_Signals come from simple technical indicators. Always do your own research and manage risk._";

/// Dot-separated thousands, no decimals: 1234567.8 renders as `1.234.568`.
pub fn format_price(price: f64) -> String {
    let rounded = price.round() as i64;
    let digits = rounded.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if rounded < 0 { format!("-{}", out) } else { out }
}

/// One signal block in the style of the chat alerts.
pub fn render_signal(signal: &Signal, thresholds: &Thresholds) -> String {
    let date = signal.as_of.format("%d %b %Y");
    match &signal.details {
        SignalDetails::Buy {
            volume_ratio,
            ma5,
            ma20,
            entry,
            take_profit,
            stop_loss,
        } => format!(
            "🚀 *BUY SIGNAL: {symbol}* ({date})\n\
             \x20  💵 Price: `{price}`\n\
             \x20  📈 Volume Ratio: `{volume_ratio:.2}x`\n\
             \x20  📊 MA5: `{ma5:.2}` | MA20: `{ma20:.2}`\n\
             \x20  🎯 Entry: `{entry}` | Support: `{support}`\n\
             \x20  ✅ Take Profit ({tp_pct}%): `{take_profit}`\n\
             \x20  ❌ Stop Loss ({sl_pct}%): `{stop_loss}`\n\
             \x20  🔍 Confirmed: golden cross, volume spike, bullish candle\n\
             \x20  #GoldenCross #{symbol}",
            symbol = signal.symbol,
            date = date,
            price = format_price(signal.price),
            volume_ratio = volume_ratio,
            ma5 = ma5,
            ma20 = ma20,
            entry = format_price(*entry),
            support = format_price(*ma20),
            tp_pct = thresholds.take_profit_pct,
            take_profit = format_price(*take_profit),
            sl_pct = thresholds.stop_loss_pct,
            stop_loss = format_price(*stop_loss),
        ),
        SignalDetails::Sell {
            volume_ratio,
            ma5,
            ma20,
            resistance,
        } => format!(
            "⚠️ *SELL SIGNAL: {symbol}* ({date})\n\
             \x20  💵 Price: `{price}`\n\
             \x20  📈 Volume Ratio: `{volume_ratio:.2}x`\n\
             \x20  📊 MA5: `{ma5:.2}` | MA20: `{ma20:.2}`\n\
             \x20  🛑 Resistance: `{resistance}`\n\
             \x20  🚨 Warning: death cross, volume spike, bearish candle\n\
             \x20  #DeathCross #{symbol}",
            symbol = signal.symbol,
            date = date,
            price = format_price(signal.price),
            volume_ratio = volume_ratio,
            ma5 = ma5,
            ma20 = ma20,
            resistance = format_price(*resistance),
        ),
        SignalDetails::Potential {
            rsi,
            ma5,
            ma20,
            rationale,
        } => format!(
            "📈 *POTENTIAL UPTREND: {symbol}* ({date})\n\
             \x20  💵 Price: `{price}`\n\
             \x20  📊 RSI14: `{rsi:.1}` | MA5: `{ma5:.2}` | MA20: `{ma20:.2}`\n\
             \x20  ℹ️ {rationale}\n\
             \x20  #PotentialUptrend #{symbol}",
            symbol = signal.symbol,
            date = date,
            price = format_price(signal.price),
            rsi = rsi,
            ma5 = ma5,
            ma20 = ma20,
            rationale = rationale,
        ),
        SignalDetails::Accumulation { volume_ratio, ma20 } => format!(
            "📦 *ACCUMULATION: {symbol}* ({date})\n\
             \x20  💵 Price: `{price}`\n\
             \x20  📈 Volume Ratio: `{volume_ratio:.2}x` (5-day avg)\n\
             \x20  📊 MA20: `{ma20:.2}`\n\
             \x20  #Accumulation #{symbol}",
            symbol = signal.symbol,
            date = date,
            price = format_price(signal.price),
            volume_ratio = volume_ratio,
            ma20 = ma20,
        ),
    }
}

/// Full scan reply: header, one block per match, separator, tallies and the
/// standing disclaimer.
pub fn render_scan_report(report: &ScanReport, thresholds: &Thresholds) -> String {
    let mut text = format!(
        "*📊 Signal scan: {}* ({})\n",
        report.classifier,
        report.as_of.format("%d %b %Y")
    );

    if report.matches.is_empty() {
        text.push_str("\n⚠️ No signals found right now.\n");
    } else {
        for signal in &report.matches {
            text.push('\n');
            text.push_str(&render_signal(signal, thresholds));
            text.push('\n');
        }
    }

    text.push_str(&format!("\n{}\n", SEPARATOR));
    text.push_str(&format!("🔄 Analyzed: *{}*", report.scanned));
    for kind in [
        SignalKind::Buy,
        SignalKind::Sell,
        SignalKind::Potential,
        SignalKind::Accumulation,
    ] {
        let count = report.count_of(kind);
        if count > 0 {
            text.push_str(&format!(" | {}: *{}*", kind, count));
        }
    }
    let unusable = report.skipped.len() + report.failed.len();
    if unusable > 0 {
        text.push_str(&format!(" | Skipped: *{}*", unusable));
    }
    text.push('\n');
    text.push_str(DISCLAIMER);
    text
}

pub fn render_diagnostic(diag: &Diagnostic) -> String {
    format!(
        "🔍 *STOCK ANALYSIS: {symbol}* ({date})\n\
         {separator}\n\
         💵 Price: `{price}` ({change:+.2}%)\n\
         📊 MA5: `{ma5:.2}` | MA20: `{ma20:.2}` | MA50: `{ma50:.2}`\n\
         📈 RSI14: `{rsi:.1}` ({zone})\n\
         🔄 Volume Ratio: `{volume_ratio:.2}x` (20-day avg)\n\
         📉 Trend: {trend}\n\
         💡 Advice: *{advice}*\n\
         #Analysis #{symbol}",
        symbol = diag.symbol,
        date = diag.as_of.format("%d %b %Y"),
        separator = SEPARATOR,
        price = format_price(diag.price),
        change = diag.change_pct,
        ma5 = diag.ma5,
        ma20 = diag.ma20,
        ma50 = diag.ma50,
        rsi = diag.rsi,
        zone = diag.rsi_zone,
        volume_ratio = diag.volume_ratio,
        trend = diag.trend,
        advice = diag.advice,
    )
}

pub fn render_welcome(display_name: &str) -> String {
    format!(
        "👋 Hello *{display_name}*!\n\n\
         Welcome to *Sahambot*.\n\n\
         📋 Available commands:\n\
         • `/signal` - BUY/SELL crossover scan\n\
         • `/potential` - potential uptrend scan\n\
         • `/accumulation` - accumulation scan\n\
         • `/analyze SYMBOL` - daily deep analysis\n\
         • `/weekly SYMBOL` - weekly deep analysis\n\n\
         ℹ️ Type `/help` to see this list again."
    )
}

pub fn render_quota_denied(limit: u32) -> String {
    format!(
        "⚠️ You have reached the daily limit of {limit} analyses for a free account. \
         Please try again tomorrow."
    )
}

pub fn render_unrecognized() -> String {
    "Sorry, I do not understand that command. Use /help to see the available commands."
        .to_string()
}

pub fn render_analyze_usage() -> String {
    "Usage: `/analyze SYMBOL` or `/weekly SYMBOL`, for example `/analyze BBCA`.".to_string()
}
