use std::str::FromStr;

use super::error::RouterError;

/// Named retrieval strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyName {
    Fast,
    Balanced,
    Comprehensive,
}

impl StrategyName {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyName::Fast => "fast",
            StrategyName::Balanced => "balanced",
            StrategyName::Comprehensive => "comprehensive",
        }
    }

    /// The next cheaper strategy, or `None` for the cheapest.
    #[inline]
    pub fn cheaper(&self) -> Option<StrategyName> {
        match self {
            StrategyName::Comprehensive => Some(StrategyName::Balanced),
            StrategyName::Balanced => Some(StrategyName::Fast),
            StrategyName::Fast => None,
        }
    }

    /// All strategies, cheapest first.
    pub const ALL: [StrategyName; 3] = [
        StrategyName::Fast,
        StrategyName::Balanced,
        StrategyName::Comprehensive,
    ];
}

impl std::fmt::Display for StrategyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyName {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(StrategyName::Fast),
            "balanced" => Ok(StrategyName::Balanced),
            "comprehensive" => Ok(StrategyName::Comprehensive),
            _ => Err(RouterError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Retrieval parameters applied uniformly to a query. Immutable at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalStrategy {
    pub name: StrategyName,
    /// Number of documents to retrieve.
    pub top_k: usize,
    /// Whether results go through a reranking pass.
    pub rerank: bool,
    /// Nominal cost charged per retrieval with this strategy.
    pub cost_per_query: f64,
}

const FAST: RetrievalStrategy = RetrievalStrategy {
    name: StrategyName::Fast,
    top_k: 2,
    rerank: false,
    cost_per_query: 0.003,
};

const BALANCED: RetrievalStrategy = RetrievalStrategy {
    name: StrategyName::Balanced,
    top_k: 5,
    rerank: false,
    cost_per_query: 0.007,
};

const COMPREHENSIVE: RetrievalStrategy = RetrievalStrategy {
    name: StrategyName::Comprehensive,
    top_k: 10,
    rerank: true,
    cost_per_query: 0.018,
};

/// Looks up the strategy definition for a name.
#[inline]
pub fn strategy_for(name: StrategyName) -> &'static RetrievalStrategy {
    match name {
        StrategyName::Fast => &FAST,
        StrategyName::Balanced => &BALANCED,
        StrategyName::Comprehensive => &COMPREHENSIVE,
    }
}

/// The highest nominal per-query cost across all strategies.
///
/// Used as the no-caching baseline when computing cost savings.
pub(crate) fn max_strategy_cost() -> f64 {
    StrategyName::ALL
        .iter()
        .map(|name| strategy_for(*name).cost_per_query)
        .fold(0.0, f64::max)
}
