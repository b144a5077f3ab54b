use atelier_core::beauty::display_groups;
use atelier_core::models::PORTRAIT_MODEL_CONFIGS;
use atelier_core::paper::{PaperFormat, PAPER_FORMATS};

pub fn run() -> anyhow::Result<()> {
    println!("Paper formats:");
    for paper in PAPER_FORMATS {
        println!("  {:<8} {}", paper.name, describe_paper(paper));
    }

    println!("\nBeauty options (use as --option CATEGORY:ID):");
    for group in display_groups() {
        println!("  [{}]", group.key);
        for grouped in group.options {
            println!("    {}:{}", grouped.category, grouped.option.id);
        }
    }

    println!("\nModels:");
    for model in PORTRAIT_MODEL_CONFIGS {
        let marker = if model.is_default { " (default)" } else { "" };
        println!("  {} - {} via {}{marker}", model.id, model.label, model.provider);
        for (key, value) in model.options.unwrap_or_default() {
            println!("      {key} = {value}");
        }
    }
    Ok(())
}

fn describe_paper(paper: &PaperFormat) -> String {
    if paper.is_custom() {
        "user-defined size".to_string()
    } else {
        format!("{} x {} {}", paper.width, paper.height, paper.unit)
    }
}
