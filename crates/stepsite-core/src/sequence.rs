//! # Tutorial Sequence
//!
//! A validated, ordered set of step pages.
//!
//! A sequence is valid when:
//! - every page declares the same `total_steps`
//! - the `step` values are unique and cover `1..=total_steps` exactly
//! - no page labels a control that its position can never render
//!
//! Validation collects every violation instead of stopping at the first,
//! so one `check` run shows an author everything that needs fixing.

use crate::navigation::{LinkStyle, Navigation};
use crate::page::TutorialPage;
use crate::render::{self, RenderOptions};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// One problem with a sequence as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("no tutorial step pages found")]
    Empty,

    #[error("{slug}: total_steps is {found}, but the sequence declares {expected}")]
    TotalStepsMismatch {
        slug: String,
        expected: u32,
        found: u32,
    },

    #[error("{slug}: step {step} is past the end of the sequence ({total_steps} steps)")]
    StepOutOfRange {
        slug: String,
        step: u32,
        total_steps: u32,
    },

    #[error("step {step} is declared by more than one page: {}", .slugs.join(", "))]
    DuplicateStep { step: u32, slugs: Vec<String> },

    /// A run of absent steps, `first..=last`.
    #[error("{}", describe_gap(*.first, *.last))]
    MissingSteps { first: u32, last: u32 },

    #[error("{slug}: labels a previous button, but step 1 has no previous control")]
    PreviousOnFirstStep { slug: String },

    #[error("{slug}: labels an advance button, but the last step has no advance control")]
    AdvanceOnLastStep { slug: String },
}

fn describe_gap(first: u32, last: u32) -> String {
    if first == last {
        format!("step {first} is missing")
    } else {
        format!("steps {first} to {last} are missing")
    }
}

fn list_violations(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("\n  - {v}")).collect()
}

/// All violations found in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tutorial sequence has {} problem(s){}", .violations.len(), list_violations(.violations))]
pub struct SequenceError {
    pub violations: Vec<Violation>,
}

// =============================================================================
// SEQUENCE
// =============================================================================

/// Step pages keyed by step number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialSequence {
    total_steps: u32,
    pages: BTreeMap<u32, TutorialPage>,
}

impl TutorialSequence {
    /// Validate pages and assemble them into a sequence.
    ///
    /// The expected length is taken from the lowest-numbered page; input
    /// order does not matter.
    pub fn from_pages(mut pages: Vec<TutorialPage>) -> Result<Self, SequenceError> {
        if pages.is_empty() {
            return Err(SequenceError {
                violations: vec![Violation::Empty],
            });
        }

        pages.sort_by(|a, b| a.step().cmp(&b.step()).then_with(|| a.slug.cmp(&b.slug)));
        let total_steps = pages[0].front.total_steps;
        let mut violations = Vec::new();

        let mut by_step: BTreeMap<u32, Vec<&TutorialPage>> = BTreeMap::new();
        for page in &pages {
            let front = &page.front;
            if front.total_steps != total_steps {
                violations.push(Violation::TotalStepsMismatch {
                    slug: page.slug.clone(),
                    expected: total_steps,
                    found: front.total_steps,
                });
            }
            if front.step > total_steps {
                violations.push(Violation::StepOutOfRange {
                    slug: page.slug.clone(),
                    step: front.step,
                    total_steps,
                });
            }
            if front.step == 1 && page.body.buttons.previous.is_some() {
                violations.push(Violation::PreviousOnFirstStep {
                    slug: page.slug.clone(),
                });
            }
            if front.step == total_steps && page.body.buttons.advance.is_some() {
                violations.push(Violation::AdvanceOnLastStep {
                    slug: page.slug.clone(),
                });
            }
            by_step.entry(front.step).or_default().push(page);
        }

        for (step, group) in &by_step {
            if group.len() > 1 {
                violations.push(Violation::DuplicateStep {
                    step: *step,
                    slugs: group.iter().map(|p| p.slug.clone()).collect(),
                });
            }
        }

        // One violation per run of absent steps, found between declared keys.
        let mut covered = 0u32;
        for &step in by_step.keys().take_while(|&&s| s <= total_steps) {
            if step > covered + 1 {
                violations.push(Violation::MissingSteps {
                    first: covered + 1,
                    last: step - 1,
                });
            }
            covered = step;
        }
        if covered < total_steps {
            violations.push(Violation::MissingSteps {
                first: covered + 1,
                last: total_steps,
            });
        }

        if !violations.is_empty() {
            return Err(SequenceError { violations });
        }

        let pages = pages.into_iter().map(|p| (p.step(), p)).collect();
        Ok(Self { total_steps, pages })
    }

    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Number of pages (always equal to `total_steps`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false: an empty sequence fails validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[must_use]
    pub fn get(&self, step: u32) -> Option<&TutorialPage> {
        self.pages.get(&step)
    }

    #[must_use]
    pub fn first(&self) -> Option<&TutorialPage> {
        self.pages.values().next()
    }

    /// Pages in step order.
    pub fn pages(&self) -> impl Iterator<Item = &TutorialPage> {
        self.pages.values()
    }

    /// Navigation for `step`, linking to the neighbours' output files.
    #[must_use]
    pub fn navigation_for(&self, step: u32, style: &LinkStyle) -> Option<Navigation> {
        let page = self.pages.get(&step)?;
        Some(Navigation::build(page.position(), &page.body.buttons, |n| {
            self.pages.get(&n).map(|p| style.href(&p.slug))
        }))
    }

    /// Render every page in step order as `(slug, html)`.
    #[must_use]
    pub fn render_all(&self, options: &RenderOptions) -> Vec<(String, String)> {
        self.pages
            .values()
            .map(|page| {
                let nav = self
                    .navigation_for(page.step(), &options.link_style)
                    .unwrap_or_default();
                (page.slug.clone(), render::render_step(page, &nav, options))
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::render::{ADVANCE_CLASS, PREVIOUS_CLASS};
    use proptest::prelude::*;

    fn page(slug: &str, step: u32, total: u32) -> TutorialPage {
        page_with_body(slug, step, total, "Body.\n")
    }

    fn page_with_body(slug: &str, step: u32, total: u32, body: &str) -> TutorialPage {
        let source = format!(
            "---\ntitle: Step {step}\ndescription: Step {step} of {total}\nstep: {step}\ntotal_steps: {total}\n---\n{body}"
        );
        TutorialPage::parse(slug, &source).unwrap()
    }

    fn pages(total: u32) -> Vec<TutorialPage> {
        (1..=total).map(|s| page(&format!("step-{s}"), s, total)).collect()
    }

    fn violations(pages: Vec<TutorialPage>) -> Vec<Violation> {
        match TutorialSequence::from_pages(pages) {
            Err(err) => err.violations,
            Ok(_) => panic!("expected invalid sequence"),
        }
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(violations(Vec::new()), vec![Violation::Empty]);
    }

    #[test]
    fn valid_sequence_orders_pages() {
        let mut input = pages(3);
        input.reverse();
        let seq = TutorialSequence::from_pages(input).unwrap();
        assert_eq!(seq.total_steps(), 3);
        assert_eq!(seq.len(), 3);
        let steps: Vec<u32> = seq.pages().map(|p| p.step()).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert_eq!(seq.first().map(|p| p.slug.as_str()), Some("step-1"));
    }

    #[test]
    fn gap_is_reported() {
        let input = vec![page("a", 1, 3), page("c", 3, 3)];
        assert_eq!(
            violations(input),
            vec![Violation::MissingSteps { first: 2, last: 2 }]
        );
    }

    #[test]
    fn consecutive_gaps_are_one_violation() {
        let input = vec![page("a", 1, 9), page("e", 5, 9)];
        assert_eq!(
            violations(input),
            vec![
                Violation::MissingSteps { first: 2, last: 4 },
                Violation::MissingSteps { first: 6, last: 9 },
            ]
        );
    }

    #[test]
    fn huge_total_steps_reports_a_single_range() {
        let input = vec![page("a", 1, 4_000_000_000)];
        assert_eq!(
            violations(input),
            vec![Violation::MissingSteps {
                first: 2,
                last: 4_000_000_000,
            }]
        );
    }

    #[test]
    fn missing_first_step_is_reported() {
        let input = vec![page("b", 2, 2)];
        assert_eq!(
            violations(input),
            vec![Violation::MissingSteps { first: 1, last: 1 }]
        );
    }

    #[test]
    fn duplicate_is_reported_with_both_slugs() {
        let input = vec![page("a", 1, 2), page("b", 2, 2), page("b2", 2, 2)];
        assert_eq!(
            violations(input),
            vec![Violation::DuplicateStep {
                step: 2,
                slugs: vec![String::from("b"), String::from("b2")],
            }]
        );
    }

    #[test]
    fn mismatched_total_is_reported() {
        let input = vec![page("a", 1, 2), page("b", 2, 3)];
        assert_eq!(
            violations(input),
            vec![Violation::TotalStepsMismatch {
                slug: String::from("b"),
                expected: 2,
                found: 3,
            }]
        );
    }

    #[test]
    fn step_past_declared_end_is_reported() {
        let input = vec![page("a", 1, 2), page("b", 2, 2), page("c", 3, 3)];
        let found = violations(input);
        assert!(found.contains(&Violation::StepOutOfRange {
            slug: String::from("c"),
            step: 3,
            total_steps: 2,
        }));
        assert!(found.iter().any(|v| matches!(v, Violation::TotalStepsMismatch { .. })));
    }

    #[test]
    fn boundary_buttons_are_reported() {
        let input = vec![
            page_with_body("a", 1, 2, "{{> partials/previous_button label=\"Back\"}}\n"),
            page_with_body("b", 2, 2, "{{> partials/advance_button label=\"More\"}}\n"),
        ];
        assert_eq!(
            violations(input),
            vec![
                Violation::PreviousOnFirstStep { slug: String::from("a") },
                Violation::AdvanceOnLastStep { slug: String::from("b") },
            ]
        );
    }

    #[test]
    fn all_violations_are_collected() {
        let input = vec![page("a", 1, 4), page("b", 1, 4), page("d", 4, 5)];
        let found = violations(input);
        // duplicate step 1, total mismatch on d, steps 2 to 3 missing
        assert_eq!(found.len(), 3, "got {found:?}");
    }

    #[test]
    fn error_display_lists_violations() {
        let err = TutorialSequence::from_pages(vec![page("a", 1, 3)]).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("tutorial sequence has 1 problem(s)"));
        assert!(text.contains("steps 2 to 3 are missing"));
    }

    #[test]
    fn navigation_links_neighbour_slugs() {
        let input = vec![page("intro", 1, 3), page("config", 2, 3), page("done", 3, 3)];
        let seq = TutorialSequence::from_pages(input).unwrap();
        let style = LinkStyle::new("/try/");

        let nav = seq.navigation_for(2, &style).unwrap();
        assert_eq!(nav.previous.map(|l| l.href), Some(String::from("/try/intro.html")));
        assert_eq!(nav.advance.map(|l| l.href), Some(String::from("/try/done.html")));
        assert!(seq.navigation_for(9, &style).is_none());
    }

    proptest! {
        #[test]
        fn contiguous_sequences_always_validate(total in 1u32..40, seed in any::<u64>()) {
            let mut input = pages(total);
            // Deterministic shuffle from the seed.
            let len = input.len();
            for i in 0..len {
                let j = ((seed.rotate_left(i as u32) as usize) ^ i) % len;
                input.swap(i, j);
            }
            let seq = TutorialSequence::from_pages(input).unwrap();
            prop_assert_eq!(seq.len() as u32, total);
            let steps: Vec<u32> = seq.pages().map(|p| p.step()).collect();
            prop_assert_eq!(steps, (1..=total).collect::<Vec<_>>());
        }

        #[test]
        fn removing_any_page_is_detected(total in 2u32..30, removed in 1u32..30) {
            let removed = (removed % total) + 1;
            let input: Vec<_> = pages(total).into_iter().filter(|p| p.step() != removed).collect();
            let result = TutorialSequence::from_pages(input);
            prop_assert!(result.is_err());
        }

        #[test]
        fn rendered_controls_follow_position(total in 1u32..20) {
            let seq = TutorialSequence::from_pages(pages(total)).unwrap();
            let rendered = seq.render_all(&RenderOptions::default());
            prop_assert_eq!(rendered.len() as u32, total);
            for (index, (_, html)) in rendered.iter().enumerate() {
                let step = index as u32 + 1;
                let previous = html.matches(PREVIOUS_CLASS).count();
                let advance = html.matches(ADVANCE_CLASS).count();
                prop_assert_eq!(previous, usize::from(step > 1));
                prop_assert_eq!(advance, usize::from(step < total));
            }
        }
    }
}
