use crate::infra::{in_memory_journal, parse_date};
use crate::screening::{configured_engine, render_risk};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use postpartum_care::error::AppError;
use postpartum_care::journal::{DailyLogSubmission, EpdsSubmission, NewMessage, Registration};
use postpartum_care::screening::{FactorAnswer, RiskFactor};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date of the final check-in (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Write the demo check-ins to this CSV file.
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
    /// Skip the patient/physician messaging portion of the demo.
    #[arg(long)]
    pub(crate) skip_messages: bool,
}

/// One scripted week, oldest first: a rough start that eases off.
const DEMO_WEEK: [DemoDay; 7] = [
    DemoDay::new("Need support", "High stress", [2, 2, 1, 4], "Some concerns", "Yes", 3.5),
    DemoDay::new("Need support", "High stress", [2, 3, 1, 4], "Some concerns", "Yes", 4.0),
    DemoDay::new("Some struggles", "High stress", [3, 3, 2, 4], "Some concerns", "Yes", 4.5),
    DemoDay::new("Some struggles", "Moderate stress", [3, 3, 2, 3], "Some concerns", "Yes", 5.0),
    DemoDay::new("Some struggles", "Moderate stress", [4, 3, 3, 3], "Feeling healthy", "No", 5.5),
    DemoDay::new("Feeling good", "Moderate stress", [4, 4, 3, 3], "Feeling healthy", "No", 6.0),
    DemoDay::new("Feeling good", "Low stress", [4, 4, 4, 2], "Feeling healthy", "No", 6.5),
];

/// Option indices for a screening that lands in the "possible depression" band.
const DEMO_EPDS_ANSWERS: [i64; 10] = [1, 1, 1, 2, 2, 1, 2, 2, 2, 3];

struct DemoDay {
    mental_health: &'static str,
    stress: &'static str,
    ratings: [i64; 4],
    physical_health: &'static str,
    hormonal_changes: &'static str,
    sleep_hours: f32,
}

impl DemoDay {
    const fn new(
        mental_health: &'static str,
        stress: &'static str,
        ratings: [i64; 4],
        physical_health: &'static str,
        hormonal_changes: &'static str,
        sleep_hours: f32,
    ) -> Self {
        Self {
            mental_health,
            stress,
            ratings,
            physical_health,
            hormonal_changes,
            sleep_hours,
        }
    }

    fn submission(&self, date: NaiveDate) -> DailyLogSubmission {
        let label = |value: &str| FactorAnswer::Label(value.to_string());
        let [social_support, nutrition, sleep_quality, economic_stress] = self.ratings;
        let factors: BTreeMap<String, FactorAnswer> = [
            (RiskFactor::MentalHealth, label(self.mental_health)),
            (RiskFactor::Stress, label(self.stress)),
            (RiskFactor::SocialSupport, FactorAnswer::Rating(social_support)),
            (RiskFactor::PhysicalHealth, label(self.physical_health)),
            (RiskFactor::Nutrition, FactorAnswer::Rating(nutrition)),
            (RiskFactor::SleepQuality, FactorAnswer::Rating(sleep_quality)),
            (RiskFactor::EconomicStress, FactorAnswer::Rating(economic_stress)),
            (RiskFactor::HormonalChanges, label(self.hormonal_changes)),
        ]
        .into_iter()
        .map(|(factor, answer)| (factor.key().to_string(), answer))
        .collect();

        DailyLogSubmission {
            date: Some(date),
            factors,
            sleep_hours: Some(self.sleep_hours),
            notes: None,
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        export_csv,
        skip_messages,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let engine = Arc::new(configured_engine()?);
    let journal = in_memory_journal(engine);

    println!("Postpartum care demo");
    let mother = journal.register(Registration {
        username: "demo-mother".to_string(),
        email: "mother@example.org".to_string(),
        is_physician: false,
        weeks_postpartum: Some(5),
        delivery_date: Some(today - Duration::days(35)),
    })?;
    let physician = journal.register(Registration {
        username: "demo-physician".to_string(),
        email: "physician@example.org".to_string(),
        is_physician: true,
        weeks_postpartum: None,
        delivery_date: None,
    })?;
    println!(
        "- Registered {} ({}) and physician {} ({})",
        mother.username, mother.id, physician.username, physician.id
    );

    let first_day = today - Duration::days(DEMO_WEEK.len() as i64 - 1);
    for (offset, day) in DEMO_WEEK.iter().enumerate() {
        let date = first_day + Duration::days(offset as i64);
        journal.record_daily_log(mother.id, day.submission(date), today)?;
    }
    println!("- Recorded {} daily check-ins", DEMO_WEEK.len());

    let screening = journal.record_epds(
        mother.id,
        EpdsSubmission {
            date: Some(today),
            answers: Some(DEMO_EPDS_ANSWERS.to_vec()),
            score: None,
        },
        today,
    )?;
    println!(
        "- EPDS screening on {}: {}/30 ({})",
        screening.date,
        screening.score,
        screening.tier.label()
    );
    println!("  {}", screening.tier.guidance());

    println!("\nCurrent risk");
    let risk = journal.current_risk(mother.id)?;
    render_risk(&risk);

    println!("\nWeekly trend");
    for point in journal.trend(mother.id)? {
        let epds = point
            .epds_score
            .map(|score| format!(" | EPDS {score}"))
            .unwrap_or_default();
        println!(
            "  {} weighted {:>5.2} | sleep {:>3.1} h{}",
            point.date,
            point.weighted_sum,
            point.sleep_hours.unwrap_or_default(),
            epds
        );
    }

    let summary = journal.patient_summary(mother.id, today)?;
    println!("\nPhysician summary");
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("  Summary payload unavailable: {}", err),
    }

    if let Some(path) = export_csv {
        let file = File::create(&path)?;
        let written = journal.export_daily_logs(mother.id, file)?;
        println!("\nExported {} check-ins to {}", written, path.display());
    }

    if skip_messages {
        return Ok(());
    }

    println!("\nMessages");
    journal.send_message(NewMessage {
        sender_id: mother.id,
        receiver_id: physician.id,
        content: "Sleep is getting a little better this week.".to_string(),
    })?;
    journal.send_message(NewMessage {
        sender_id: physician.id,
        receiver_id: mother.id,
        content: "Glad to hear it. Let's review your screening at the next visit.".to_string(),
    })?;
    for message in journal.messages(mother.id)? {
        println!(
            "  [{}] {} -> {}: {}",
            message.sent_at.format("%H:%M"),
            message.sender_id,
            message.receiver_id,
            message.content
        );
    }

    Ok(())
}
