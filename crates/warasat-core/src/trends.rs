/// Yearly gold rate and property index in Pakistan, used to compare holding
/// property against holding gold.
pub mod history {
    use serde::Serialize;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct TrendPoint {
        pub year: u16,
        /// PKR per tola.
        pub gold_rate: u32,
        /// Normalised average price per square foot.
        pub property_index: u32,
    }

    const fn point(year: u16, gold_rate: u32, property_index: u32) -> TrendPoint {
        TrendPoint {
            year,
            gold_rate,
            property_index,
        }
    }

    pub static HISTORICAL_TRENDS: [TrendPoint; 21] = [
        point(2004, 12_000, 1_000),
        point(2005, 14_000, 1_200),
        point(2006, 18_000, 1_500),
        point(2007, 20_000, 1_800),
        point(2008, 25_000, 2_000),
        point(2009, 32_000, 2_200),
        point(2010, 40_000, 2_500),
        point(2011, 55_000, 3_000),
        point(2012, 60_000, 3_500),
        point(2013, 58_000, 4_000),
        point(2014, 55_000, 4_500),
        point(2015, 48_000, 5_500),
        point(2016, 52_000, 6_500),
        point(2017, 56_000, 7_500),
        point(2018, 65_000, 8_000),
        point(2019, 85_000, 8_200),
        point(2020, 110_000, 8_500),
        point(2021, 120_000, 9_000),
        point(2022, 150_000, 9_500),
        point(2023, 220_000, 10_000),
        point(2024, 250_000, 10_500),
    ];

    pub fn for_year(year: u16) -> Option<&'static TrendPoint> {
        HISTORICAL_TRENDS.iter().find(|p| p.year == year)
    }

    /// How many times each series grew between two years, as
    /// `(gold, property)`. `None` if either year is outside the table.
    pub fn growth_multiple(from_year: u16, to_year: u16) -> Option<(f64, f64)> {
        let from = for_year(from_year)?;
        let to = for_year(to_year)?;
        Some((
            f64::from(to.gold_rate) / f64::from(from.gold_rate),
            f64::from(to.property_index) / f64::from(from.property_index),
        ))
    }
}
