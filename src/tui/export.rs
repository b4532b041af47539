//! Summary panel rendering and CSV export of the final record

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::path::Path;
use thiserror::Error;

use crate::wizard::{DogField, FinalRecord, MeasurementKind};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Measurements are not finished yet")]
    NotFinished,
    #[error("No export file given (start with --export FILE)")]
    NoDestination,
}

const HEADER: [&str; 9] = [
    "breed",
    "sex",
    "age",
    "weight",
    "owner",
    "length_cm",
    "width_cm",
    "height_cm",
    "thickness_cm",
];

/// Write the record as a header row plus one data row
pub fn write_csv(path: &Path, record: &FinalRecord) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    let mut row: Vec<String> = DogField::ALL
        .iter()
        .map(|field| record.dog.get(*field).to_string())
        .collect();
    row.extend(
        MeasurementKind::ALL
            .iter()
            .map(|kind| format!("{:.2}", record.value(*kind))),
    );
    writer.write_record(&row)?;
    writer.flush()?;
    Ok(())
}

/// Render the final measurements panel
pub fn render_summary_panel(
    frame: &mut Frame,
    area: Rect,
    record: Option<&FinalRecord>,
    export_path: Option<&Path>,
) {
    let block = Block::default()
        .title(" Final Measurements ")
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let record = match record {
        Some(record) => record,
        None => {
            let text = Paragraph::new("Not all views are confirmed")
                .style(Style::default().fg(Color::Red));
            frame.render_widget(text, inner);
            return;
        }
    };

    let mut lines: Vec<Line> = vec![];

    lines.push(Line::from(Span::styled("Dog:", Style::default().bold())));
    for field in DogField::ALL {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<10}", format!("{}:", field.label())),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(record.dog.get(field).to_string()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Paw:", Style::default().bold())));
    for kind in MeasurementKind::ALL {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<10}", format!("{}:", kind.label())),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("{:>6.2} cm", record.value(kind)),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }

    lines.push(Line::from(""));
    let export_line = match export_path {
        Some(path) => Span::styled(
            format!("[e] Export to {}", path.display()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled(
            "(start with --export FILE to enable CSV export)",
            Style::default().fg(Color::DarkGray).dim(),
        ),
    };
    lines.push(Line::from(export_line));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::DogInfoBuilder;

    #[test]
    fn test_write_csv() {
        let record = FinalRecord {
            dog: DogInfoBuilder::default()
                .breed("Border Collie")
                .sex("F")
                .age("4")
                .weight("18 kg")
                .owner("Kim, J.")
                .build()
                .unwrap(),
            length_cm: 7.5,
            width_cm: 3.0,
            height_cm: 2.0,
            thickness_cm: 2.456,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paw.csv");
        write_csv(&path, &record).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("breed,sex,age,weight,owner,length_cm,width_cm,height_cm,thickness_cm")
        );
        assert_eq!(
            lines.next(),
            Some("Border Collie,F,4,18 kg,\"Kim, J.\",7.50,3.00,2.00,2.46")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_csv_bad_path() {
        let record = FinalRecord {
            dog: Default::default(),
            length_cm: 1.0,
            width_cm: 1.0,
            height_cm: 1.0,
            thickness_cm: 1.0,
        };
        let err = write_csv(Path::new("/nonexistent-dir/out.csv"), &record).unwrap_err();
        assert!(matches!(err, ExportError::CsvError(_) | ExportError::IoError(_)));
    }
}
