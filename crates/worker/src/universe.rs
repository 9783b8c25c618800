use sentipick_core::domain::Candidate;

/// Large-cap US equities grouped by sector. Names repeat both within a group and across
/// groups; each appearance is screened on its own.
const DEFAULT_UNIVERSE: &[&str] = &[
    // Technology
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "NFLX", "ADBE", "CRM",
    "ORCL", "CSCO", "INTC", "AMD", "QCOM", "AVGO", "TXN", "MU", "INTU", "ADP",
    "IBM", "NOW", "SNPS", "KLAC", "LRCX", "ADI", "CDNS", "MCHP", "MRVL", "WDAY",
    // Healthcare
    "JNJ", "UNH", "PFE", "ABBV", "TMO", "DHR", "LLY", "ABT", "BMY", "AMGN",
    "CVS", "CI", "ANTM", "GILD", "REGN", "VRTX", "BIIB", "HUM", "ISRG", "BDX",
    "DVA", "HCA", "CNC", "AET", "WBA", "CAH", "MCK", "ABC", "ZTS", "ALGN",
    // Financials
    "JPM", "BAC", "WFC", "GS", "MS", "BLK", "V", "MA", "AXP", "C",
    "USB", "PNC", "TFC", "COF", "SCHW", "CB", "AIG", "MET", "PRU", "ALL",
    "TRV", "AFL", "HIG", "PFG", "BEN", "IVZ", "TROW", "AMP", "NTRS", "STT",
    // Consumer discretionary
    "AMZN", "TSLA", "HD", "MCD", "DIS", "NKE", "SBUX", "TGT", "LOW", "TJX",
    "BKNG", "MAR", "HLT", "CMG", "YUM", "DPZ", "SBUX", "ULTA", "ROST", "TJX",
    "ORLY", "AZO", "KMX", "LVS", "WYNN", "MGM", "CCL", "RCL", "NCLH", "UAL",
    // Consumer staples
    "PG", "KO", "PEP", "WMT", "COST", "PM", "MO", "MDLZ", "GIS", "K",
    "HSY", "SJM", "CAG", "KMB", "CL", "EL", "ULTA", "DG", "DLTR", "FIVE",
    "KR", "SFM", "SPLS", "BBY", "GME", "TSCO", "ORLY", "AZO", "KMX", "CVNA",
    // Energy
    "XOM", "CVX", "COP", "EOG", "SLB", "ENPH", "SEDG", "FSLR", "NEE", "DUK",
    "SO", "D", "NEE", "AEP", "XEL", "DTE", "ED", "PEG", "WEC", "CMS",
    "CNP", "AEE", "EIX", "PCG", "SRE", "VLO", "MPC", "PSX", "VLO", "MPC",
    // Industrials
    "CAT", "DE", "BA", "GE", "MMM", "HON", "UPS", "FDX", "LMT", "RTX",
    "NOC", "GD", "LHX", "TDG", "TXT", "EMR", "ETN", "ITW", "DOV", "XYL",
    "PH", "AME", "FTV", "IEX", "PNR", "DCI", "GWW", "FAST", "GPC", "WSO",
    // Real estate
    "AMT", "PLD", "CCI", "EQIX", "DLR", "PSA", "O", "SPG", "VICI", "WELL",
    "EQR", "AVB", "MAA", "ESS", "UDR", "CPT", "AIV", "BXP", "VNO", "SLG",
    "KIM", "FRT", "REG", "MAC", "PEAK", "ARE", "BMRN", "HST", "PK", "AHT",
    // Materials
    "LIN", "APD", "FCX", "NEM", "BHP", "RIO", "VALE", "AA", "X", "NUE",
    "SHW", "ECL", "APTV", "ALB", "LVS", "WYNN", "MGM", "CCL", "RCL", "NCLH",
    "DOW", "DD", "EMN", "LYB", "BLL", "IP", "PKG", "WRK", "SEE", "BMS",
    // Communication services
    "GOOGL", "META", "NFLX", "DIS", "CMCSA", "CHTR", "VZ", "T", "TMUS", "ATVI",
    "EA", "TTWO", "ZNGA", "MTCH", "SNAP", "PINS", "TWTR", "LYV", "FOX", "NWSA",
    "PARA", "WBD", "LUMN", "CTL", "VZ", "T", "TMUS", "S", "LBRDK", "LBRDA",
    // Utilities
    "NEE", "DUK", "SO", "D", "AEP", "XEL", "DTE", "ED", "PEG", "WEC",
    "CMS", "CNP", "AEE", "EIX", "PCG", "SRE", "AEP", "XEL", "DTE", "ED",
    "PEG", "WEC", "CMS", "CNP", "AEE", "EIX", "PCG", "SRE", "VLO", "MPC",
];

#[derive(Debug, Clone, Default)]
pub struct UniverseOptions {
    /// Replaces the built-in list when set.
    pub symbols: Option<Vec<String>>,

    /// Screen only the first N entries.
    pub max_candidates: Option<usize>,
}

impl UniverseOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("UNIVERSE_SYMBOLS") {
            let symbols: Vec<String> = s.split(',').map(str::to_string).collect();
            if symbols.iter().any(|s| !s.trim().is_empty()) {
                out.symbols = Some(symbols);
            }
        }

        if let Ok(s) = std::env::var("UNIVERSE_MAX") {
            if let Ok(n) = s.trim().parse::<usize>() {
                out.max_candidates = Some(n);
            }
        }

        out
    }
}

pub fn build_universe(opts: &UniverseOptions) -> anyhow::Result<Vec<Candidate>> {
    let mut out: Vec<Candidate> = match &opts.symbols {
        Some(symbols) => symbols
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Candidate::new(s.to_ascii_uppercase()))
            .collect(),
        None => DEFAULT_UNIVERSE.iter().map(|s| Candidate::new(*s)).collect(),
    };

    if let Some(max) = opts.max_candidates {
        out.truncate(max);
    }

    anyhow::ensure!(!out.is_empty(), "candidate universe is empty");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_keeps_every_duplicate() {
        let universe = build_universe(&UniverseOptions::default()).unwrap();
        assert_eq!(universe.len(), 330);
        assert_eq!(universe[0].as_str(), "AAPL");
        assert_eq!(universe[329].as_str(), "MPC");

        let count = |sym: &str| universe.iter().filter(|c| c.as_str() == sym).count();
        // Across groups.
        assert_eq!(count("AMZN"), 2);
        // Within one group.
        assert_eq!(count("SBUX"), 2);
        assert_eq!(count("TJX"), 2);
        assert_eq!(count("VLO"), 3);

        let distinct: std::collections::HashSet<&str> =
            universe.iter().map(|c| c.as_str()).collect();
        assert_eq!(universe.len() - distinct.len(), 54);
    }

    #[test]
    fn explicit_symbols_are_normalized() {
        let opts = UniverseOptions {
            symbols: Some(vec![" aaa".to_string(), "".to_string(), "Bbb ".to_string()]),
            max_candidates: None,
        };
        let universe = build_universe(&opts).unwrap();
        let symbols: Vec<&str> = universe.iter().map(|c| c.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB"]);
    }

    #[test]
    fn max_candidates_truncates_in_order() {
        let opts = UniverseOptions {
            symbols: None,
            max_candidates: Some(3),
        };
        let universe = build_universe(&opts).unwrap();
        let symbols: Vec<&str> = universe.iter().map(|c| c.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn empty_universe_is_rejected() {
        let opts = UniverseOptions {
            symbols: Some(vec![" ".to_string()]),
            max_candidates: None,
        };
        assert!(build_universe(&opts).is_err());

        let opts = UniverseOptions {
            symbols: None,
            max_candidates: Some(0),
        };
        assert!(build_universe(&opts).is_err());
    }
}
