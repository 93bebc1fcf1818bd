use notehub_client::view::{AdminPanel, AdminUserDetail, Dashboard, NoteView, View};
use notehub_common::domain::{Note, Plan, User};
use time::{Duration, OffsetDateTime};

const ACCESS_DENIED: &str = "Access denied. This page requires an admin account.";

fn naive_time_ago(timestamp: OffsetDateTime) -> String {
    let now = OffsetDateTime::now_utc();
    let duration = now - timestamp;

    if duration < Duration::minutes(1) {
        "just now".to_string()
    } else if duration < Duration::hours(1) {
        format!("{} minutes ago", duration.whole_minutes())
    } else if duration < Duration::days(1) {
        format!("{} hours ago", duration.whole_hours())
    } else {
        format!("{} days ago", duration.whole_days())
    }
}

fn checkbox(plan: &Plan) -> &'static str {
    if plan.is_done {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes yet.");
        return;
    }

    for note in notes {
        let open = note.open_plans();
        let plans = if open > 0 {
            format!(", {open} open plans")
        } else {
            String::new()
        };
        println!(
            "{:>5}  {}  (updated {}{plans})",
            note.id,
            note.title,
            naive_time_ago(note.updated_at)
        );
    }
}

pub fn plans(plans: &[Plan]) {
    if plans.is_empty() {
        println!("No plans for this note.");
        return;
    }

    for plan in plans {
        println!("{:>5}  {} {}", plan.id, checkbox(plan), plan.title);
    }
}

pub fn users(users: &[User]) {
    for user in users {
        let role = if user.is_admin { "admin" } else { "user" };
        println!("{:>5}  {:<24} {role}", user.id, user.username);
    }
}

pub fn dashboard(view: &Dashboard) {
    let role = if view.is_admin { " (admin)" } else { "" };
    println!("Notes of {}{role}\n", view.username);
    notes(&view.notes);
}

pub fn note(view: &NoteView) {
    let note = &view.note;
    println!("# {}", note.title);
    println!(
        "created {} / updated {}\n",
        naive_time_ago(note.created_at),
        naive_time_ago(note.updated_at)
    );

    if !note.content.is_empty() {
        println!("{}\n", note.content);
    }

    println!("Plans ({}/{} done)", view.completed(), view.plans.len());
    plans(&view.plans);
}

pub fn admin_panel(view: &AdminPanel) {
    match view {
        AdminPanel::AccessDenied => println!("{ACCESS_DENIED}"),
        AdminPanel::Table { users: u, notes: n } => {
            println!("Users ({})", u.len());
            users(u);
            println!("\nNotes ({})", n.len());
            for note in n {
                println!("{:>5}  {}  (owner {})", note.id, note.title, note.owner_id);
            }
        }
    }
}

pub fn admin_user(view: &AdminUserDetail) {
    match view {
        AdminUserDetail::AccessDenied => println!("{ACCESS_DENIED}"),
        AdminUserDetail::Table { user_id, notes: n } => {
            println!("Notes of user {user_id}\n");
            notes(n);
        }
    }
}

pub fn view(view: &View) {
    match view {
        View::Login => println!("Log in with `notehub account login`."),
        View::Register => println!("Create an account with `notehub account register`."),
        View::Dashboard(v) => dashboard(v),
        View::Note(v) => note(v),
        View::Admin(v) => admin_panel(v),
        View::AdminUser(v) => admin_user(v),
    }
}
