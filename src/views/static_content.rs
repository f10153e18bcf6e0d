//! Header, roadmap and footer text

pub const TITLE: &str = "VinuHub Token & Liquidity Locker";
pub const TAGLINE: &str = "Securely lock your ERC20 or LP tokens on VinuChain";

pub const TELEGRAM_URL: &str = "https://t.me/VinuHubOfficial";
pub const X_URL: &str = "https://x.com/VinuHubOfficial";
pub const COPYRIGHT: &str = "© 2025 VinuHub. All rights reserved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadmapPhase {
    pub title: &'static str,
    pub summary: &'static str,
    pub current: bool,
}

pub const ROADMAP: [RoadmapPhase; 3] = [
    RoadmapPhase {
        title: "Phase 1: Launch",
        summary: "Deploy token locker with core features (Q3 2025)",
        current: true,
    },
    RoadmapPhase {
        title: "Phase 2: Enhancements",
        summary: "Add batch operations and analytics (Q4 2025)",
        current: false,
    },
    RoadmapPhase {
        title: "Phase 3: Integration",
        summary: "Integrate with more DeFi platforms (Q1 2026)",
        current: false,
    },
];

pub fn header() -> Vec<String> {
    vec![TITLE.to_string(), TAGLINE.to_string()]
}

pub fn roadmap() -> Vec<String> {
    ROADMAP
        .iter()
        .map(|phase| {
            let marker = if phase.current { " (current)" } else { "" };
            format!("{}{}: {}", phase.title, marker, phase.summary)
        })
        .collect()
}

pub fn footer() -> Vec<String> {
    vec![
        format!("Telegram: {}", TELEGRAM_URL),
        format!("X: {}", X_URL),
        COPYRIGHT.to_string(),
    ]
}
