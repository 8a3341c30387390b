//! Keyword routing from free-text queries to intents.
//!
//! Each surface owns an ordered rule table and the first matching rule wins.
//! The order is part of the contract: "outage summary by region" must route
//! to [`Intent::OutagesByRegion`] because that rule precedes the summary rule.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PeakDemand,
    OutagesByRegion,
    /// Dashboard only: an outage query that does not mention "region".
    OutageTotals,
    DemandSupplyGap,
    /// CLI only: write plot data for an external renderer.
    RenderPlot,
    Summary,
    Unrecognized,
}

/// Which entry point a query arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Cli,
    Dashboard,
}

struct Rule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

fn peak_demand(q: &str) -> bool {
    q.contains("peak demand")
}

fn outage_by_region(q: &str) -> bool {
    q.contains("outage") && q.contains("region")
}

fn any_outage(q: &str) -> bool {
    q.contains("outage")
}

fn gap(q: &str) -> bool {
    q.contains("gap") || (q.contains("demand") && q.contains("supply"))
}

fn plot(q: &str) -> bool {
    q.contains("plot") || q.contains("visual")
}

fn summary(q: &str) -> bool {
    q.contains("summary") || q.contains("report")
}

#[rustfmt::skip]
const CLI_RULES: &[Rule] = &[
    Rule { intent: Intent::PeakDemand, matches: peak_demand },
    Rule { intent: Intent::OutagesByRegion, matches: outage_by_region },
    Rule { intent: Intent::DemandSupplyGap, matches: gap },
    Rule { intent: Intent::RenderPlot, matches: plot },
    Rule { intent: Intent::Summary, matches: summary },
];

#[rustfmt::skip]
const DASHBOARD_RULES: &[Rule] = &[
    Rule { intent: Intent::PeakDemand, matches: peak_demand },
    Rule { intent: Intent::OutagesByRegion, matches: outage_by_region },
    Rule { intent: Intent::OutageTotals, matches: any_outage },
    Rule { intent: Intent::DemandSupplyGap, matches: gap },
    Rule { intent: Intent::Summary, matches: summary },
];

impl Surface {
    fn rules(self) -> &'static [Rule] {
        match self {
            Surface::Cli => CLI_RULES,
            Surface::Dashboard => DASHBOARD_RULES,
        }
    }
}

/// Resolves `query` against the rule table of `surface`.
pub fn resolve(surface: Surface, query: &str) -> Intent {
    let normalized = query.trim().to_lowercase();

    surface
        .rules()
        .iter()
        .find(|rule| (rule.matches)(&normalized))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unrecognized)
}
