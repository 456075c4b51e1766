use chrono::NaiveDate;

use crate::aspects::OrbTable;
use crate::biorhythm::{BiorhythmCalculator, BiorhythmProfile, ForecastDay};
use crate::chart::{BirthProfile, NatalChart, NatalChartAssembler, TransitEvaluator, TransitReport};
use crate::ephemeris::{AnalyticEphemeris, CelestialBody, EphemerisSource, NATAL_BODIES, TRANSIT_BODIES};
use crate::error::Result;
use crate::numerology::NumerologyMatrix;
use crate::report::{DailyReport, ForecastSummary, RecommendationCombiner};

/// Tunables for the forecast engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub natal_bodies: Vec<CelestialBody>,
    pub transit_bodies: Vec<CelestialBody>,
    pub natal_orbs: OrbTable,
    pub transit_orbs: OrbTable,
    /// Default length of a biorhythm forecast
    pub forecast_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            natal_bodies: NATAL_BODIES.to_vec(),
            transit_bodies: TRANSIT_BODIES.to_vec(),
            natal_orbs: OrbTable::major(),
            transit_orbs: OrbTable::major(),
            forecast_days: 7,
        }
    }
}

/// Entry point tying one ephemeris source to every calculator.
///
/// Every method is a pure function of its arguments and the read-only source, so one
/// engine can serve many threads at once.
pub struct ForecastEngine {
    source: Box<dyn EphemerisSource>,
    settings: EngineSettings,
    assembler: NatalChartAssembler,
    evaluator: TransitEvaluator,
    biorhythm: BiorhythmCalculator,
    combiner: RecommendationCombiner,
}

impl ForecastEngine {
    pub fn new(source: Box<dyn EphemerisSource>, settings: EngineSettings) -> Self {
        log::info!("Forecast engine using the {} ephemeris", source.name());
        Self {
            assembler: NatalChartAssembler::new(
                settings.natal_orbs.clone(),
                settings.natal_bodies.clone(),
            ),
            evaluator: TransitEvaluator::new(
                settings.transit_orbs.clone(),
                settings.transit_bodies.clone(),
            ),
            biorhythm: BiorhythmCalculator::new(),
            combiner: RecommendationCombiner::new(),
            source,
            settings,
        }
    }

    /// Engine backed by the built-in analytic ephemeris
    pub fn analytic() -> Self {
        Self::new(Box::new(AnalyticEphemeris::new()), EngineSettings::default())
    }

    pub fn source(&self) -> &dyn EphemerisSource {
        self.source.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn natal_chart(&self, profile: &BirthProfile) -> Result<NatalChart> {
        self.assembler.assemble(self.source(), profile)
    }

    pub fn transits(&self, natal: &NatalChart, target_date: NaiveDate) -> TransitReport {
        self.evaluator.evaluate(self.source(), natal, target_date)
    }

    pub fn biorhythms(&self, birth_date: NaiveDate, target_date: NaiveDate) -> Result<BiorhythmProfile> {
        self.biorhythm.calculate(birth_date, target_date)
    }

    /// Forecast of `days` days, or the configured default length
    pub fn biorhythm_forecast(
        &self,
        birth_date: NaiveDate,
        start: NaiveDate,
        days: Option<u32>,
    ) -> Result<Vec<ForecastDay>> {
        self.biorhythm
            .forecast(birth_date, start, days.unwrap_or(self.settings.forecast_days))
    }

    pub fn numerology(&self, birth_date: NaiveDate) -> NumerologyMatrix {
        NumerologyMatrix::calculate(birth_date)
    }

    /// Rejects a target before birth; transit failures are flagged on the report
    pub fn daily_report(&self, natal: &NatalChart, target_date: NaiveDate) -> Result<DailyReport> {
        let (_, _, report) = self.day(natal, target_date)?;
        Ok(report)
    }

    pub fn summary(&self, natal: &NatalChart, target_date: NaiveDate) -> Result<ForecastSummary> {
        let (transits, biorhythm, report) = self.day(natal, target_date)?;
        Ok(ForecastSummary::build(&report, &transits, &biorhythm))
    }

    fn day(
        &self,
        natal: &NatalChart,
        target_date: NaiveDate,
    ) -> Result<(TransitReport, BiorhythmProfile, DailyReport)> {
        let biorhythm = self.biorhythms(natal.profile.birth_date, target_date)?;
        let transits = self.transits(natal, target_date);
        let report = self
            .combiner
            .combine(&transits, &biorhythm, Some(&natal.features));
        log::info!(
            "Daily report for {}: {} recommendations, {} critical notes",
            target_date,
            report.recommendations.len(),
            report.critical_notes.len()
        );
        Ok((transits, biorhythm, report))
    }
}
