//! Page layout of the visit report.
//!
//! Everything here is pure: text is wrapped to fixed column widths and each
//! block gets a vertical offset in millimetres, computed as a running total of
//! the wrapped line counts of the blocks above it. Blocks that run past the
//! printable area continue on a fresh page. The renderer only draws what this
//! module decided.

use std::collections::VecDeque;

use chrono::{Datelike, NaiveDate};

use crate::features::visits::dtos::{ChecklistItemDto, VisitReportRequestDto};
use crate::features::visits::models::ConsultantInfo;

pub const LINE_HEIGHT_MM: f32 = 5.0;
/// Characters per line for full-width text (170 mm at 10 pt)
pub const WRAP_COLUMNS: usize = 95;
/// Characters per line inside a half-width information block
pub const HALF_COLUMNS: usize = 45;
/// Characters per line in the observations column of the checklist
pub const NOTES_COLUMNS: usize = 55;

pub const PAGE_TOP_MM: f32 = 20.0;
pub const PAGE_BOTTOM_MM: f32 = 277.0;
const HEADING_GAP_MM: f32 = 10.0;
const SECTION_GAP_MM: f32 = 10.0;
const INFO_ROW_1_MM: f32 = 40.0;
const INFO_ROW_2_MM: f32 = 85.0;
const FLOW_START_MM: f32 = 125.0;
const TABLE_HEADER_MM: f32 = 8.0;
const TABLE_ROW_PADDING_MM: f32 = 3.0;

pub const REPORT_TITLE: &str = "RAPPORT DE VISITE";
pub const CHECKLIST_HEADER: [&str; 3] = ["Élément vérifié", "Effectué", "Observations"];

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Observations,
    Verifications,
    Conclusion,
    Actions,
    NextVisit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRow {
    pub label: &'static str,
    pub done: &'static str,
    pub notes: Vec<String>,
}

impl ChecklistRow {
    fn height(&self) -> f32 {
        self.notes.len().max(1) as f32 * LINE_HEIGHT_MM + TABLE_ROW_PADDING_MM
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    Lines(Vec<String>),
    Checklist(Vec<ChecklistRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub section: Section,
    pub column: Column,
    pub heading: String,
    pub body: BlockBody,
    /// Distance from the top of the page
    pub y_mm: f32,
}

impl Block {
    pub fn height(&self) -> f32 {
        HEADING_GAP_MM
            + match &self.body {
                BlockBody::Lines(lines) => lines.len() as f32 * LINE_HEIGHT_MM,
                BlockBody::Checklist(rows) => {
                    TABLE_HEADER_MM + rows.iter().map(ChecklistRow::height).sum::<f32>()
                }
            }
    }

    pub fn bottom(&self) -> f32 {
        self.y_mm + self.height()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub blocks: Vec<Block>,
    /// "Généré le dd/mm/yyyy - Page i sur N"
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub pages: Vec<Page>,
}

impl ReportLayout {
    /// Sections in reading order, each listed once
    #[cfg(test)]
    pub fn sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        for block in self.pages.iter().flat_map(|p| &p.blocks) {
            if sections.last() != Some(&block.section) {
                sections.push(block.section);
            }
        }
        sections
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out a visit report
pub fn layout(
    report: &VisitReportRequestDto,
    consultant: &ConsultantInfo,
    generated_on: NaiveDate,
) -> ReportLayout {
    let mut pager = Paginator::new();

    pager.push_fixed(text_block(
        Section::General,
        Column::Full,
        REPORT_TITLE,
        Vec::new(),
        PAGE_TOP_MM,
    ));

    let establishment = &report.establishment;
    let mut establishment_lines = vec![
        format!("Nom: {}", establishment.name),
        format!("Adresse: {}", establishment.address),
        format!("{} {}", establishment.postal_code, establishment.city),
        format!("Catégorie: {}", establishment.category),
    ];
    if !establishment.types.is_empty() {
        establishment_lines.push(format!("Type: {}", establishment.types.join(", ")));
    }
    let visit_lines = vec![
        format!("Date: {}", french_long_date(report.visit_date)),
        format!("Type: {}", report.visit_type.label()),
    ];
    let row_1_bottom = pager.push_pair(
        ("ÉTABLISSEMENT", establishment_lines),
        ("VISITE", visit_lines),
        INFO_ROW_1_MM,
    );

    let contact = &report.contact;
    let mut contact_lines = vec![
        format!("Nom: {}", contact.name),
        format!("Fonction: {}", contact.role),
    ];
    if let Some(email) = contact.email.as_deref().filter(|e| !e.is_empty()) {
        contact_lines.push(format!("Email: {}", email));
    }
    if let Some(phone) = contact.phone.as_deref().filter(|p| !p.is_empty()) {
        contact_lines.push(format!("Téléphone: {}", phone));
    }
    let mut consultant_lines = vec![
        format!("Nom: {}", consultant.full_name),
        format!("Email: {}", consultant.email),
    ];
    if let Some(phone) = consultant.phone.as_deref().filter(|p| !p.is_empty()) {
        consultant_lines.push(format!("Téléphone: {}", phone));
    }
    let row_2_bottom = pager.push_pair(
        ("CONTACT", contact_lines),
        ("CONSULTANT", consultant_lines),
        INFO_ROW_2_MM.max(row_1_bottom + SECTION_GAP_MM),
    );

    pager.cursor = FLOW_START_MM.max(row_2_bottom + SECTION_GAP_MM);

    let observations = report
        .observations
        .as_deref()
        .map(|text| wrap(text, WRAP_COLUMNS))
        .unwrap_or_default();
    pager.place_text(Section::Observations, "OBSERVATIONS", observations);

    pager.place_checklist(vec![
        checklist_row("Vérifications techniques", &report.technical_checks),
        checklist_row("Registre de sécurité", &report.safety_register),
        checklist_row("Formation du personnel", &report.staff_training),
        checklist_row("Prescriptions", &report.prescriptions),
    ]);

    pager.place_text(
        Section::Conclusion,
        "CONCLUSION",
        wrap(&report.conclusion, WRAP_COLUMNS),
    );

    if let Some(actions) = report.actions.as_deref().filter(|a| !a.trim().is_empty()) {
        pager.place_text(Section::Actions, "ACTIONS À MENER", wrap(actions, WRAP_COLUMNS));
    }

    if let Some(next_date) = report.next_visit_date {
        let mut lines = vec![format!("Date: {}", french_long_date(next_date))];
        if let Some(next_type) = report.next_visit_type {
            lines.push(format!("Type: {}", next_type.label()));
        }
        pager.place_text(Section::NextVisit, "PROCHAINE VISITE", lines);
    }

    pager.finish(generated_on)
}

fn text_block(
    section: Section,
    column: Column,
    heading: &str,
    lines: Vec<String>,
    y_mm: f32,
) -> Block {
    Block {
        section,
        column,
        heading: heading.to_string(),
        body: BlockBody::Lines(lines),
        y_mm,
    }
}

fn checklist_row(label: &'static str, item: &ChecklistItemDto) -> ChecklistRow {
    ChecklistRow {
        label,
        done: if item.done { "Oui" } else { "Non" },
        notes: item
            .notes
            .as_deref()
            .map(|notes| wrap(notes, NOTES_COLUMNS))
            .unwrap_or_default(),
    }
}

struct Paginator {
    pages: Vec<Vec<Block>>,
    cursor: f32,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_TOP_MM,
        }
    }

    fn current(&mut self) -> &mut Vec<Block> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_TOP_MM;
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= PAGE_TOP_MM
    }

    fn push_fixed(&mut self, block: Block) -> f32 {
        let bottom = block.bottom();
        self.current().push(block);
        bottom
    }

    /// Two half-width blocks side by side; returns the lower bottom edge
    fn push_pair(
        &mut self,
        (left_heading, left_lines): (&str, Vec<String>),
        (right_heading, right_lines): (&str, Vec<String>),
        y_mm: f32,
    ) -> f32 {
        let half = |lines: Vec<String>| -> Vec<String> {
            lines.iter().flat_map(|l| wrap(l, HALF_COLUMNS)).collect()
        };
        let left = self.push_fixed(text_block(
            Section::General,
            Column::Left,
            left_heading,
            half(left_lines),
            y_mm,
        ));
        let right = self.push_fixed(text_block(
            Section::General,
            Column::Right,
            right_heading,
            half(right_lines),
            y_mm,
        ));
        left.max(right)
    }

    /// Lines that fit below the cursor once a heading is drawn
    fn lines_available(&self) -> usize {
        let room = PAGE_BOTTOM_MM - self.cursor - HEADING_GAP_MM;
        if room < 0.0 {
            0
        } else {
            (room / LINE_HEIGHT_MM).floor() as usize
        }
    }

    fn place_text(&mut self, section: Section, heading: &str, lines: Vec<String>) {
        let mut remaining = lines;
        let mut continued = false;

        loop {
            let needed = usize::from(!remaining.is_empty());
            let heading_fits = self.cursor + HEADING_GAP_MM <= PAGE_BOTTOM_MM;
            if (!heading_fits || self.lines_available() < needed) && !self.at_page_top() {
                self.new_page();
            }

            let take = remaining.len().min(self.lines_available().max(1));
            let rest = remaining.split_off(take);
            let title = if continued {
                format!("{} (suite)", heading)
            } else {
                heading.to_string()
            };

            let block = text_block(section, Column::Full, &title, remaining, self.cursor);
            self.cursor = block.bottom() + SECTION_GAP_MM;
            self.current().push(block);

            if rest.is_empty() {
                break;
            }
            remaining = rest;
            continued = true;
            self.new_page();
        }
    }

    /// The checklist breaks between rows, repeating its heading
    fn place_checklist(&mut self, rows: Vec<ChecklistRow>) {
        let mut remaining: VecDeque<ChecklistRow> = rows.into();
        let mut continued = false;
        let page_room = PAGE_BOTTOM_MM - PAGE_TOP_MM - HEADING_GAP_MM - TABLE_HEADER_MM;
        let min_row = LINE_HEIGHT_MM + TABLE_ROW_PADDING_MM;

        while let Some(first) = remaining.front() {
            // Rows that fit a fresh page are never split; taller ones need one line here
            let room = PAGE_BOTTOM_MM - self.cursor - HEADING_GAP_MM - TABLE_HEADER_MM;
            let needed = if first.height() <= page_room {
                first.height()
            } else {
                min_row
            };
            if needed > room && !self.at_page_top() {
                self.new_page();
            }

            let mut bottom = self.cursor + HEADING_GAP_MM + TABLE_HEADER_MM;
            let mut page_rows = Vec::new();
            while let Some(row) = remaining.front() {
                if bottom + row.height() <= PAGE_BOTTOM_MM {
                    bottom += row.height();
                    if let Some(row) = remaining.pop_front() {
                        page_rows.push(row);
                    }
                    continue;
                }
                if !page_rows.is_empty() && row.height() <= page_room {
                    break;
                }

                // Split the notes; the rest carries the same label onto the next page
                let lines = ((PAGE_BOTTOM_MM - bottom - TABLE_ROW_PADDING_MM) / LINE_HEIGHT_MM)
                    .floor()
                    .max(0.0) as usize;
                if lines == 0 {
                    break;
                }
                if let Some(mut row) = remaining.pop_front() {
                    let rest = row.notes.split_off(lines.min(row.notes.len()));
                    if !rest.is_empty() {
                        remaining.push_front(ChecklistRow {
                            label: row.label,
                            done: row.done,
                            notes: rest,
                        });
                    }
                    page_rows.push(row);
                }
                break;
            }

            let heading = if continued {
                "VÉRIFICATIONS (suite)"
            } else {
                "VÉRIFICATIONS"
            };
            let block = Block {
                section: Section::Verifications,
                column: Column::Full,
                heading: heading.to_string(),
                body: BlockBody::Checklist(page_rows),
                y_mm: self.cursor,
            };
            self.cursor = block.bottom() + SECTION_GAP_MM;
            self.current().push(block);

            if !remaining.is_empty() {
                continued = true;
                self.new_page();
            }
        }
    }

    fn finish(self, generated_on: NaiveDate) -> ReportLayout {
        let total = self.pages.len();
        let stamp = generated_on.format("%d/%m/%Y").to_string();
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, blocks)| Page {
                number: index + 1,
                blocks,
                footer: format!("Généré le {} - Page {} sur {}", stamp, index + 1, total),
            })
            .collect();

        ReportLayout {
            title: REPORT_TITLE.to_string(),
            pages,
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split; blank lines are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let split = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split].to_string());
                word = &word[split..];
            }

            let word_len = word.chars().count();
            if word_len == 0 {
                continue;
            }
            if current_len == 0 {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        lines.push(current);
    }

    lines
}

/// "12 mars 2026"
pub fn french_long_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        FRENCH_MONTHS[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::visits::dtos::{ReportContactDto, ReportEstablishmentDto};
    use crate::features::visits::models::VisitType;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn consultant() -> ConsultantInfo {
        ConsultantInfo {
            full_name: "Julien Morel".to_string(),
            email: "julien.morel@firesafe.pro".to_string(),
            phone: Some("06 12 34 56 78".to_string()),
        }
    }

    fn request() -> VisitReportRequestDto {
        VisitReportRequestDto {
            establishment_id: Uuid::new_v4(),
            establishment: ReportEstablishmentDto {
                name: "Hôtel du Lac".to_string(),
                address: "3 quai des Pêcheurs".to_string(),
                postal_code: "74000".to_string(),
                city: "Annecy".to_string(),
                category: "3ème catégorie".to_string(),
                types: vec!["O".to_string(), "N".to_string()],
            },
            visit_date: date(2026, 3, 12),
            visit_type: VisitType::FirstVisit,
            consultant_id: "consultant-1".to_string(),
            contact: ReportContactDto {
                name: "Claire Martin".to_string(),
                role: "Directrice".to_string(),
                email: None,
                phone: None,
            },
            observations: Some("Extincteurs à jour.\nIssues de secours dégagées.".to_string()),
            technical_checks: ChecklistItemDto {
                done: true,
                notes: Some("RAS".to_string()),
            },
            safety_register: ChecklistItemDto::default(),
            staff_training: ChecklistItemDto::default(),
            prescriptions: ChecklistItemDto::default(),
            conclusion: "Établissement conforme.".to_string(),
            actions: Some("Former deux nouveaux serre-files.".to_string()),
            next_visit_date: None,
            next_visit_type: None,
        }
    }

    fn flow_blocks(layout: &ReportLayout) -> Vec<&Block> {
        layout
            .pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter(|b| b.section != Section::General)
            .collect()
    }

    #[test]
    fn test_sections_follow_reading_order() {
        let layout = layout(&request(), &consultant(), date(2026, 3, 12));
        assert_eq!(
            layout.sections(),
            vec![
                Section::General,
                Section::Observations,
                Section::Verifications,
                Section::Conclusion,
                Section::Actions,
            ]
        );
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn test_next_visit_comes_last() {
        let mut report = request();
        report.next_visit_date = Some(date(2026, 9, 1));
        report.next_visit_type = Some(VisitType::Reminder);
        let with_actions = layout(&report, &consultant(), date(2026, 3, 12));
        assert_eq!(
            with_actions.sections()[4..],
            [Section::Actions, Section::NextVisit]
        );

        report.actions = Some("   ".to_string());
        let without_actions = layout(&report, &consultant(), date(2026, 3, 12));
        assert_eq!(
            without_actions.sections()[3..],
            [Section::Conclusion, Section::NextVisit]
        );

        let next = flow_blocks(&without_actions)
            .into_iter()
            .find(|b| b.section == Section::NextVisit)
            .unwrap();
        assert_eq!(
            next.body,
            BlockBody::Lines(vec![
                "Date: 01 septembre 2026".to_string(),
                "Type: Visite de rappel".to_string(),
            ])
        );
    }

    #[test]
    fn test_offsets_are_running_totals() {
        let layout = layout(&request(), &consultant(), date(2026, 3, 12));
        let blocks = flow_blocks(&layout);

        // Two observation lines below the heading, then one section gap
        assert_eq!(blocks[0].y_mm, FLOW_START_MM);
        assert_eq!(
            blocks[1].y_mm,
            FLOW_START_MM + HEADING_GAP_MM + 2.0 * LINE_HEIGHT_MM + SECTION_GAP_MM
        );
        for pair in blocks.windows(2) {
            assert_eq!(pair[1].y_mm, pair[0].bottom() + SECTION_GAP_MM);
        }
    }

    #[test]
    fn test_wrap_respects_column_width() {
        let text = "Le registre de sécurité doit être tenu à jour après chaque vérification \
                    périodique des installations techniques, y compris désenfumage et \
                    alarme. Référence: ERP-ANNECY-2026-000000000000000000000000000000000000001";
        for width in [NOTES_COLUMNS, HALF_COLUMNS, 10] {
            let lines = wrap(text, width);
            assert!(lines.len() > 1);
            assert!(lines.iter().all(|l| l.chars().count() <= width));
        }
        assert_eq!(wrap("a\n\nb", 10), vec!["a", "", "b"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn test_long_observations_continue_on_next_page() {
        let mut report = request();
        report.observations = Some(
            (1..=120)
                .map(|i| format!("Observation numéro {}", i))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        let layout = layout(&report, &consultant(), date(2026, 10, 19));

        assert!(layout.page_count() >= 3);
        for page in &layout.pages {
            assert!(page.blocks.iter().all(|b| b.bottom() <= PAGE_BOTTOM_MM));
            assert_eq!(
                page.footer,
                format!(
                    "Généré le 19/10/2026 - Page {} sur {}",
                    page.number,
                    layout.page_count()
                )
            );
        }

        let observation_lines: usize = flow_blocks(&layout)
            .iter()
            .filter(|b| b.section == Section::Observations)
            .map(|b| match &b.body {
                BlockBody::Lines(lines) => lines.len(),
                BlockBody::Checklist(_) => 0,
            })
            .sum();
        assert_eq!(observation_lines, 120);
        assert_eq!(layout.pages[1].blocks[0].heading, "OBSERVATIONS (suite)");
        assert_eq!(layout.pages[1].blocks[0].y_mm, PAGE_TOP_MM);
    }

    #[test]
    fn test_checklist_marks_done_items() {
        let layout = layout(&request(), &consultant(), date(2026, 3, 12));
        let checklist = flow_blocks(&layout)
            .into_iter()
            .find_map(|b| match &b.body {
                BlockBody::Checklist(rows) => Some(rows.clone()),
                BlockBody::Lines(_) => None,
            })
            .unwrap();

        let summary: Vec<(&str, &str)> = checklist.iter().map(|r| (r.label, r.done)).collect();
        assert_eq!(
            summary,
            vec![
                ("Vérifications techniques", "Oui"),
                ("Registre de sécurité", "Non"),
                ("Formation du personnel", "Non"),
                ("Prescriptions", "Non"),
            ]
        );
    }

    #[test]
    fn test_checklist_notes_taller_than_a_page_are_split() {
        let mut report = request();
        report.technical_checks.notes = Some(
            (1..=80)
                .map(|i| format!("Note numéro {}", i))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        let layout = layout(&report, &consultant(), date(2026, 10, 19));

        for page in &layout.pages {
            assert!(page.blocks.iter().all(|b| b.bottom() <= PAGE_BOTTOM_MM));
            assert_eq!(
                page.footer,
                format!(
                    "Généré le 19/10/2026 - Page {} sur {}",
                    page.number,
                    layout.page_count()
                )
            );
        }

        let checklists: Vec<(&str, &Vec<ChecklistRow>)> = flow_blocks(&layout)
            .into_iter()
            .filter_map(|b| match &b.body {
                BlockBody::Checklist(rows) => Some((b.heading.as_str(), rows)),
                BlockBody::Lines(_) => None,
            })
            .collect();
        assert!(checklists.len() >= 2);
        assert_eq!(checklists[0].0, "VÉRIFICATIONS");
        assert_eq!(checklists[1].0, "VÉRIFICATIONS (suite)");
        assert_eq!(checklists[1].1[0].label, "Vérifications techniques");
        assert_eq!(checklists[1].1[0].done, "Oui");

        let note_lines: usize = checklists
            .iter()
            .flat_map(|(_, rows)| rows.iter())
            .filter(|r| r.label == "Vérifications techniques")
            .map(|r| r.notes.len())
            .sum();
        assert_eq!(note_lines, 80);

        let labels: Vec<&str> = checklists
            .iter()
            .flat_map(|(_, rows)| rows.iter().map(|r| r.label))
            .filter(|label| *label != "Vérifications techniques")
            .collect();
        assert_eq!(
            labels,
            vec!["Registre de sécurité", "Formation du personnel", "Prescriptions"]
        );
    }

    #[test]
    fn test_general_blocks_show_visit_and_consultant() {
        let layout = layout(&request(), &consultant(), date(2026, 3, 12));
        let general: Vec<&Block> = layout.pages[0]
            .blocks
            .iter()
            .filter(|b| b.section == Section::General)
            .collect();

        let headings: Vec<&str> = general.iter().map(|b| b.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![REPORT_TITLE, "ÉTABLISSEMENT", "VISITE", "CONTACT", "CONSULTANT"]
        );
        assert_eq!(
            general[2].body,
            BlockBody::Lines(vec![
                "Date: 12 mars 2026".to_string(),
                "Type: Première visite".to_string(),
            ])
        );
        assert_eq!(general[3].y_mm, INFO_ROW_2_MM);
    }
}
