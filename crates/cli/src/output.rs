use deskflow_core::{LaptopRequest, RequestState};

/// One-line human description used after a successful submission.
pub fn describe(request: &LaptopRequest) -> String {
    format!("model {}, status {}", request.model(), RequestState::of(&request.request_status))
}

/// Plain-text table over fetched requests. Local workflow status and
/// ITSM ticket status are separate columns; the two vocabularies
/// overlap but are never merged.
pub fn render_table(requests: &[LaptopRequest]) -> String {
    if requests.is_empty() {
        return "(no requests)".to_owned();
    }

    let mut rows = vec![Row {
        request_id: "REQUEST".to_owned(),
        subject: "SUBJECT".to_owned(),
        model: "MODEL".to_owned(),
        status: "STATUS".to_owned(),
        ticket: "TICKET".to_owned(),
        ticket_status: "TICKET STATUS".to_owned(),
        created_by: "CREATED BY".to_owned(),
        date: "DATE".to_owned(),
        task: "TASK".to_owned(),
    }];
    rows.extend(requests.iter().map(Row::from));

    let widths = [
        rows.iter().map(|r| r.request_id.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.subject.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.model.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.status.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.ticket.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.ticket_status.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.created_by.len()).max().unwrap_or(0),
        rows.iter().map(|r| r.date.len()).max().unwrap_or(0),
    ];

    rows.iter()
        .map(|row| {
            format!(
                "{:w0$}  {:w1$}  {:w2$}  {:w3$}  {:w4$}  {:w5$}  {:w6$}  {:w7$}  {}",
                row.request_id,
                row.subject,
                row.model,
                row.status,
                row.ticket,
                row.ticket_status,
                row.created_by,
                row.date,
                row.task,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
                w4 = widths[4],
                w5 = widths[5],
                w6 = widths[6],
                w7 = widths[7],
            )
            .trim_end()
            .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

struct Row {
    request_id: String,
    subject: String,
    model: String,
    status: String,
    ticket: String,
    ticket_status: String,
    created_by: String,
    date: String,
    task: String,
}

impl From<&LaptopRequest> for Row {
    fn from(request: &LaptopRequest) -> Self {
        Self {
            request_id: request.request_id.clone(),
            subject: truncate(&request.subject, 40),
            model: request.model().to_owned(),
            status: RequestState::of(&request.request_status).to_string(),
            ticket: request
                .ticket_no()
                .map(|no| no.to_string())
                .unwrap_or_else(|| "-".to_owned()),
            ticket_status: request.ticket_status().unwrap_or("-").to_owned(),
            created_by: request.created_by.emp_name.clone(),
            date: request.created_date.format("%Y-%m-%d %H:%M").to_string(),
            task: request.task_id.as_deref().unwrap_or("-").to_owned(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
