//! 把反馈渲染成纯文本视图
//!
//! 顺序与界面一致：分数、总体评价，然后是五个标签页。

use std::fmt;

use super::feedback::{Feedback, ReadinessBand};
use crate::models::EssayFeedback;

/// 标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTab {
    Structure,
    Language,
    PromptFit,
    AdmissionsView,
    ActionPlan,
}

impl FeedbackTab {
    pub const ALL: [FeedbackTab; 5] = [
        FeedbackTab::Structure,
        FeedbackTab::Language,
        FeedbackTab::PromptFit,
        FeedbackTab::AdmissionsView,
        FeedbackTab::ActionPlan,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FeedbackTab::Structure => "Structure",
            FeedbackTab::Language => "Language",
            FeedbackTab::PromptFit => "Prompt Fit",
            FeedbackTab::AdmissionsView => "Admissions View",
            FeedbackTab::ActionPlan => "Action Plan",
        }
    }
}

/// 渲染完整反馈
pub fn render_feedback(feedback: &Feedback) -> String {
    FeedbackView(feedback).to_string()
}

/// 纯文本视图
pub struct FeedbackView<'a>(pub &'a Feedback);

impl fmt::Display for FeedbackView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Feedback::PlainText(text) => writeln!(f, "{}", text.trim_end()),
            Feedback::Structured(report) => {
                write_header(f, report)?;
                for tab in FeedbackTab::ALL {
                    writeln!(f)?;
                    writeln!(f, "== {} ==", tab.title())?;
                    write_tab(f, report, tab)?;
                }
                Ok(())
            }
        }
    }
}

fn write_header(f: &mut fmt::Formatter<'_>, report: &EssayFeedback) -> fmt::Result {
    let band = ReadinessBand::from_score(report.readiness_score);
    writeln!(f, "Readiness Score: {}/100", report.readiness_score)?;
    writeln!(f, "{}", band.label())?;
    writeln!(f)?;
    writeln!(f, "Overall Summary")?;
    writeln!(f, "{}", report.overall_summary)
}

fn write_list(f: &mut fmt::Formatter<'_>, marker: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "(none)");
    }
    for item in items {
        writeln!(f, "{} {}", marker, item)?;
    }
    Ok(())
}

fn write_tab(f: &mut fmt::Formatter<'_>, report: &EssayFeedback, tab: FeedbackTab) -> fmt::Result {
    match tab {
        FeedbackTab::Structure => {
            if report.structural_issues.is_empty() {
                return writeln!(f, "(none)");
            }
            for issue in &report.structural_issues {
                writeln!(f, "- {}", issue.section)?;
                writeln!(f, "  Issue: {}", issue.issue)?;
                writeln!(f, "  Suggestion: {}", issue.suggestion)?;
            }
            Ok(())
        }
        FeedbackTab::Language => {
            if report.suggestions.is_empty() {
                return writeln!(f, "(none)");
            }
            for suggestion in &report.suggestions {
                writeln!(f, "[{}]", suggestion.kind.as_str())?;
                writeln!(f, "  Original: {}", suggestion.original_text)?;
                writeln!(f, "  Improved: {}", suggestion.corrected_text)?;
                writeln!(f, "  Why: {}", suggestion.explanation)?;
            }
            Ok(())
        }
        FeedbackTab::PromptFit => {
            writeln!(f, "What You're Doing Right:")?;
            writeln!(f, "{}", report.prompt_alignment.aligned)?;
            writeln!(f, "Missing from Your Response:")?;
            writeln!(f, "{}", report.prompt_alignment.not_aligned)
        }
        FeedbackTab::AdmissionsView => {
            writeln!(f, "Strengths:")?;
            write_list(f, "+", &report.strengths)?;
            writeln!(f, "Red Flags / Weaknesses:")?;
            write_list(f, "!", &report.red_flags)
        }
        FeedbackTab::ActionPlan => {
            if report.improvement_plan.is_empty() {
                writeln!(f, "(none)")?;
            }
            for (i, step) in report.improvement_plan.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, step)?;
            }
            writeln!(f, "Example Rewrite: Introduction")?;
            writeln!(f, "{}", report.rewrite_suggestion)
        }
    }
}
