use nbdoc_core::{AppViewModel, Notice, Phase};

const BAR_WIDTH: usize = 20;

/// Status lines for the current view, written to stderr by the app loop.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let phase_label = match view.phase {
        Phase::Idle => "Idle",
        Phase::Reading => "Reading notebooks",
        Phase::Submitting => "Generating documentation",
        Phase::Ready => "Ready",
        Phase::Error => "Failed",
    };
    lines.push(format!(
        "{} {:>3}% {}",
        progress_bar(view.progress_percent),
        view.progress_percent,
        phase_label
    ));

    if let Some(message) = &view.error_message {
        lines.push(format!("  error: {message}"));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("  {}", notice_text(notice)));
    }
    lines
}

/// One-line summary of the selection shown before generation starts.
pub fn render_selection(view: &AppViewModel) -> String {
    if view.selected_files.is_empty() {
        return "No notebooks selected".to_string();
    }
    let names: Vec<String> = view
        .selected_files
        .iter()
        .map(|file| format!("[{}] {}", file.index, file.name))
        .collect();
    format!(
        "Selected {} notebook(s): {} | {} / {} / {}",
        names.len(),
        names.join(", "),
        view.style.language,
        view.style.doc_style,
        view.style.tone
    )
}

pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Failure(failure) => format!("error: {failure}"),
        Notice::Exported(path) => format!("exported to {}", path.display()),
        Notice::Copied => "raw text copied".to_string(),
        Notice::CopyFailed(reason) => format!("copy failed: {reason}"),
    }
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
