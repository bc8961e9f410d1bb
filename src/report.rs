//! Alert rendering.
//!
//! Turns a `ScanOutcome` into the email subject, a styled HTML body, and a
//! plain-text fallback for credential-less runs. All inputs are
//! already-defaulted numerics, so rendering cannot fail.

use crate::types::ScanOutcome;

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Delinquency severity bands: below 10% reads healthy, below 20% elevated,
/// anything above that distressed.
const IMORA_LOW: f64 = 10.0;
const IMORA_MEDIUM: f64 = 20.0;

const COLOR_LOW: &str = "#059669";
const COLOR_MEDIUM: &str = "#d97706";
const COLOR_HIGH: &str = "#dc2626";

/// Format a peso amount with a magnitude suffix: `$1.2B`, `$3.4M`, `$5.6K`.
pub fn format_amount(n: i64) -> String {
    let v = n as f64;
    if v >= 1e9 {
        format!("${:.1}B", v / 1e9)
    } else if v >= 1e6 {
        format!("${:.1}M", v / 1e6)
    } else if v >= 1e3 {
        format!("${:.1}K", v / 1e3)
    } else {
        format!("${n}")
    }
}

/// Hex color for a delinquency rate.
pub fn delinquency_color(rate: f64) -> &'static str {
    if rate < IMORA_LOW {
        COLOR_LOW
    } else if rate < IMORA_MEDIUM {
        COLOR_MEDIUM
    } else {
        COLOR_HIGH
    }
}

// ---------------------------------------------------------------------------
// Payload rendering
// ---------------------------------------------------------------------------

/// Email subject summarising the new period labels.
pub fn subject(outcome: &ScanOutcome) -> String {
    format!("🔔 CONDUSEF SOFIPO Update — {}", outcome.period_labels())
}

/// Styled HTML email body grouping records by period, entities in
/// lexicographic order within each period.
pub fn render_html(outcome: &ScanOutcome) -> String {
    let mut rows = String::new();

    for (period, records) in &outcome.periods {
        rows.push_str(&format!(
            r#"
        <tr style="background:#FFF7ED;">
            <td colspan="5" style="padding:12px 16px; font-weight:700; font-size:15px; color:#EC7000; border-bottom:2px solid #EC7000;">
                📅 {label}
            </td>
        </tr>"#,
            label = period.label()
        ));

        // BTreeMap iteration gives the lexicographic entity order.
        for (entity, vals) in records {
            rows.push_str(&format!(
                r#"
        <tr>
            <td style="padding:10px 16px; border-bottom:1px solid #f3f4f6; font-weight:600;">{entity}</td>
            <td style="padding:10px 16px; border-bottom:1px solid #f3f4f6; text-align:right; font-variant-numeric:tabular-nums;">{total}</td>
            <td style="padding:10px 16px; border-bottom:1px solid #f3f4f6; text-align:right; font-variant-numeric:tabular-nums;">{performing}</td>
            <td style="padding:10px 16px; border-bottom:1px solid #f3f4f6; text-align:right; font-variant-numeric:tabular-nums;">{non_performing}</td>
            <td style="padding:10px 16px; border-bottom:1px solid #f3f4f6; text-align:right; font-weight:700; color:{color};">{imora:.1}%</td>
        </tr>"#,
                entity = entity,
                total = format_amount(vals.total_portfolio),
                performing = format_amount(vals.performing),
                non_performing = format_amount(vals.non_performing),
                color = delinquency_color(vals.delinquency_rate),
                imora = vals.delinquency_rate,
            ));
        }
    }

    format!(
        r#"
    <div style="font-family:'Segoe UI',Arial,sans-serif; max-width:700px; margin:0 auto; background:#fff;">
        <div style="background:#1a1a2e; padding:24px 30px; border-radius:12px 12px 0 0;">
            <h1 style="color:#fff; font-size:20px; margin:0;">🔔 CONDUSEF SOFIPO Data Update</h1>
            <p style="color:#9ca3af; font-size:13px; margin:4px 0 0;">New credit portfolio data available</p>
        </div>

        <div style="padding:24px 30px;">
            <p style="color:#374151; font-size:14px; margin-bottom:20px;">
                New monthly data has been published on CONDUSEF for the tracked SOFIPOs.
            </p>

            <table style="width:100%; border-collapse:collapse; font-size:13px; border:1px solid #e5e7eb; border-radius:8px;">
                <thead>
                    <tr style="background:#1a1a2e;">
                        <th style="padding:12px 16px; color:#fff; text-align:left; font-size:12px;">Entity</th>
                        <th style="padding:12px 16px; color:#fff; text-align:right; font-size:12px;">Total Loans</th>
                        <th style="padding:12px 16px; color:#fff; text-align:right; font-size:12px;">Performing</th>
                        <th style="padding:12px 16px; color:#fff; text-align:right; font-size:12px;">Non-Performing</th>
                        <th style="padding:12px 16px; color:#fff; text-align:right; font-size:12px;">IMORA</th>
                    </tr>
                </thead>
                <tbody>{rows}
                </tbody>
            </table>

            <p style="color:#6b7280; font-size:12px; margin-top:24px; padding-top:16px; border-top:1px solid #e5e7eb;">
                Source: <a href="https://registros.condusef.gob.mx" style="color:#EC7000;">registros.condusef.gob.mx</a> — Section 27 (SOFIPOs)<br>
                This is an automated alert from the SOFIPO credit monitor.
            </p>
        </div>
    </div>"#
    )
}

/// Plain-text rendering printed to stdout when email credentials are
/// absent.
pub fn render_text(outcome: &ScanOutcome) -> String {
    let mut out = String::new();

    for (period, records) in &outcome.periods {
        out.push_str(&format!("New CONDUSEF SOFIPO data: {}\n", period.label()));
        for (entity, vals) in records {
            out.push_str(&format!(
                "  {entity}: total {total} | performing {performing} | non-performing {non_performing} | IMORA {imora:.1}%\n",
                total = format_amount(vals.total_portfolio),
                performing = format_amount(vals.performing),
                non_performing = format_amount(vals.non_performing),
                imora = vals.delinquency_rate,
            ));
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
