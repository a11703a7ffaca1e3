use crate::data::aggregate::SummaryStats;

use super::FALLBACK_MARKER;

fn money(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("${}", group_thousands(v.round() as i64)),
        None => "n/a".to_string(),
    }
}

fn one_decimal(v: Option<f64>, unit: &str) -> String {
    match v {
        Some(v) => format!("{v:.1} {unit}"),
        None => "n/a".to_string(),
    }
}

fn risk_pct(stats: &SummaryStats) -> String {
    match stats.risk {
        Some(risk) => format!("{:.1}% (unvalidated estimate)", risk.high_risk_pct()),
        None => "n/a".to_string(),
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// Prompt sent to the text service.
pub fn render_prompt(stats: &SummaryStats) -> String {
    format!(
        "Analyze this German credit risk dataset and provide actionable insights:\n\
         \n\
         Dataset Summary:\n\
         - Total records: {count}\n\
         - Average credit amount: {credit}\n\
         - Average age: {age}\n\
         - Average duration: {duration}\n\
         - High risk percentage: {risk}\n\
         \n\
         Please provide:\n\
         1. Key insights about credit risk patterns\n\
         2. Critical risk factors identification\n\
         3. Actionable recommendations for risk management\n\
         4. Trends and correlations observed\n\
         \n\
         Format with bullet points and keep under 400 words. Focus on actionable business insights.",
        count = stats.count,
        credit = money(stats.mean_credit_amount),
        age = one_decimal(stats.mean_age, "years"),
        duration = one_decimal(stats.mean_duration, "months"),
        risk = risk_pct(stats),
    )
}

/// Deterministic local report used when the service is unavailable.
pub fn render_fallback(stats: &SummaryStats, error: &str) -> String {
    if stats.count == 0 {
        return format!(
            "{FALLBACK_MARKER}\n\n\
             **Key Insights:**\n\
             • 0 credit applications match the current filters\n\
             • Widen the purpose, housing, age or amount selection to see statistics\n\
             \n\
             Service error: {error}"
        );
    }

    format!(
        "{FALLBACK_MARKER}\n\n\
         **Key Insights:**\n\
         • {count} credit applications analyzed\n\
         • Average credit amount: {credit}\n\
         • Average age: {age}, average duration: {duration}\n\
         • High-risk applications: {risk}\n\
         \n\
         **Risk Factors:**\n\
         • Housing type significantly impacts approval rates\n\
         • Duration and amount show strong correlation\n\
         • Age groups 26-35 have highest application volume\n\
         \n\
         **Recommendations:**\n\
         • Focus on improving risk assessment for high-amount loans\n\
         • Consider housing stability as key factor\n\
         • Implement age-based risk scoring\n\
         \n\
         Service error: {error}",
        count = stats.count,
        credit = money(stats.mean_credit_amount),
        age = one_decimal(stats.mean_age, "years"),
        duration = one_decimal(stats.mean_duration, "months"),
        risk = risk_pct(stats),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::RiskEstimate;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(3271), "3,271");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn prompt_embeds_every_field() {
        let stats = SummaryStats {
            count: 1000,
            mean_credit_amount: Some(3271.258),
            mean_age: Some(35.546),
            mean_duration: Some(20.903),
            risk: Some(RiskEstimate::placeholder()),
        };
        let prompt = render_prompt(&stats);
        assert!(prompt.contains("Total records: 1000"));
        assert!(prompt.contains("Average credit amount: $3,271"));
        assert!(prompt.contains("Average age: 35.5 years"));
        assert!(prompt.contains("Average duration: 20.9 months"));
        assert!(prompt.contains("High risk percentage: 30.0% (unvalidated estimate)"));
    }

    #[test]
    fn fallback_is_deterministic() {
        let stats = SummaryStats {
            count: 7,
            mean_credit_amount: Some(100.0),
            mean_age: Some(30.0),
            mean_duration: Some(12.0),
            risk: Some(RiskEstimate::placeholder()),
        };
        let a = render_fallback(&stats, "timeout");
        assert_eq!(a, render_fallback(&stats, "timeout"));
        assert!(a.contains("7 credit applications analyzed"));
        assert!(a.ends_with("Service error: timeout"));
    }
}
