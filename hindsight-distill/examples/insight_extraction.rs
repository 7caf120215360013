//! Insight Extraction Example
//!
//! Run with:
//!   cargo run -p hindsight-distill --example insight_extraction
//!
//! Builds a small experience pool, retrieves fewshot exemplars for a new
//! task, then runs two insight extraction passes against a scripted model.
//! Everything runs offline; no API key is needed.

use hindsight_core::{
    categorize, ExperienceMemory, FewshotRequest, InsightStore, RecordBatch, Step, Trial,
};
use hindsight_distill::{ExtractConfig, ExtractReport, Extractor, ScriptedModel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Insight Extraction Demo                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // Ingest a handful of finished attempts: three solved on the first
    // try, one never solved, one solved on the retry after a reflection.
    let mut memory = ExperienceMemory::default();
    let ids = memory.add_experiences(demo_batch())?;

    let categories = categorize(memory.records());
    println!("📥 Experience pool: {} records ingested", ids.len());
    println!("   ├── solved first try: {}", categories.success.len());
    println!("   ├── solved on retry:  {}", categories.compare.len());
    println!("   └── never solved:     {}", categories.fail.len());
    println!();

    // Fewshot retrieval for a task the pool has never seen. Only records
    // whose first trial succeeded are eligible as exemplars.
    let request = FewshotRequest::new("What is the capital of Italy?").with_num_fewshots(2);
    let fewshots = memory.retrieve(&request)?;

    println!("🔎 Fewshots for \"What is the capital of Italy?\":");
    for (i, exemplar) in fewshots.iter().enumerate() {
        println!();
        println!("   Exemplar {}:", i + 1);
        for line in exemplar.lines() {
            println!("   │ {line}");
        }
    }
    println!();

    // First extraction pass: the model proposes the same rule for every
    // critique, so duplicate adds collapse into agreement.
    let mut insights = InsightStore::new(10);
    let extractor = Extractor::new(ExtractConfig::default().with_num_folds(2));

    let model = ScriptedModel::from_responses(vec![
        "ADD: Search for the answer instead of guessing when unsure.".into();
        3
    ]);

    println!("🧠 Extraction pass 1 (scripted model)...");
    let report = extractor.extract(memory.records(), &mut insights, &model).await?;
    print_report(&report, model.calls());

    // Second pass: the model endorses the existing rule and proposes one
    // more. Positions on AGREE are tolerated; the lookup is text-driven.
    let model = ScriptedModel::from_responses(vec![
        "AGREE 1: Search for the answer instead of guessing when unsure.\n\
         ADD: Verify dates against a source before answering."
            .into();
        3
    ]);

    println!("🧠 Extraction pass 2 (scripted model)...");
    let report = extractor.extract(memory.records(), &mut insights, &model).await?;
    print_report(&report, model.calls());

    println!("📜 Curated insights:");
    for line in insights.numbered_list().lines() {
        println!("   {line}");
    }
    println!();
    println!("These rules and the retrieved exemplars form the preamble for");
    println!("the agent's next attempt.");

    Ok(())
}

fn print_report(report: &ExtractReport, calls: usize) {
    println!(
        "   {} folds, {} compare + {} success prompts ({} model calls)",
        report.folds, report.compare_prompts, report.success_prompts, calls
    );
    println!(
        "   {} operations parsed: {} applied, {} skipped, {} failed",
        report.operations_parsed,
        report.stats.applied,
        report.stats.skipped,
        report.stats.failed
    );
    println!();
}

/// Five finished records: France, Mercury, and Austen solved first try,
/// the Mariana Trench never solved, the Berlin Wall solved on the retry.
fn demo_batch() -> RecordBatch {
    let solved = |steps: Vec<Step>, answer: &str| vec![Trial::new(true, answer, steps)];

    RecordBatch::new(
        vec![
            "What is the capital of France?".into(),
            "Which planet is closest to the sun?".into(),
            "Who wrote Pride and Prejudice?".into(),
            "How deep is the Mariana Trench?".into(),
            "In which year did the Berlin Wall fall?".into(),
        ],
        vec![
            "Paris".into(),
            "Mercury".into(),
            "Jane Austen".into(),
            "about 11 kilometres".into(),
            "1989".into(),
        ],
        vec![
            solved(
                vec![
                    Step::new(
                        "The capital of France is well documented",
                        "Search[capital of France]",
                        "Paris is the capital and largest city of France.",
                    ),
                    Step::new("That settles it", "Finish[Paris]", "Paris"),
                ],
                "Paris",
            ),
            solved(
                vec![Step::new(
                    "I recall the planet closest to the sun",
                    "Finish[Mercury]",
                    "Mercury",
                )],
                "Mercury",
            ),
            solved(
                vec![
                    Step::new(
                        "Pride and Prejudice is a classic English novel",
                        "Search[author of Pride and Prejudice]",
                        "Jane Austen wrote Pride and Prejudice.",
                    ),
                    Step::new("The author is clear now", "Finish[Jane Austen]", "Jane Austen"),
                ],
                "Jane Austen",
            ),
            vec![Trial::new(
                false,
                "",
                vec![Step::new(
                    "I will estimate the depth",
                    "Guess[about ten kilometres]",
                    "incorrect",
                )],
            )],
            vec![
                Trial::new(
                    false,
                    "",
                    vec![Step::new("I will guess the year", "Guess[1991]", "incorrect")],
                ),
                Trial::new(
                    true,
                    "1989",
                    vec![Step::new(
                        "Guessing failed before, searching instead",
                        "Search[fall of the Berlin Wall]",
                        "The Berlin Wall fell in 1989.",
                    )],
                ),
            ],
        ],
    )
    .with_reflections(vec![
        vec![],
        vec![],
        vec![],
        vec![],
        vec!["I guessed instead of checking a source; next time search first.".into()],
    ])
}
