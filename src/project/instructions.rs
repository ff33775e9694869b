//! Closing instructions printed after a successful setup.

use std::path::Path;

use crate::requirements::Platform;
use crate::ui::UserInterface;

pub const FRONTEND_URL: &str = "http://localhost:5173";
pub const BACKEND_URL: &str = "http://localhost:8000";
pub const API_DOCS_URL: &str = "http://localhost:8000/api/documentation";

/// Seeded demo accounts as (role, email). All use the password `password`.
pub const DEMO_ACCOUNTS: &[(&str, &str)] = &[
    ("Admin", "admin@gearlog.local"),
    ("Manager", "gestor@gearlog.local"),
    ("Technician", "tecnico@gearlog.local"),
];

/// Command that starts MySQL on `platform`, if there is a single obvious one.
pub fn mysql_start_command(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::MacOS => Some("brew services start mysql"),
        Platform::Linux => Some("sudo systemctl start mysql"),
        Platform::Windows => None,
    }
}

/// Lines of the "next steps" text.
pub fn instruction_lines(project: &Path) -> Vec<String> {
    let backend = project.join("backend");
    let frontend = project.join("frontend");

    let mut lines = vec![
        "Next Steps:".to_string(),
        String::new(),
        "1. Start the backend server:".to_string(),
        format!("   cd {}", backend.display()),
        "   php artisan serve".to_string(),
        String::new(),
        "2. Start the frontend server (in a new terminal):".to_string(),
        format!("   cd {}", frontend.display()),
        "   npm run dev".to_string(),
        String::new(),
        "3. Access the application:".to_string(),
        format!("   Frontend: {}", FRONTEND_URL),
        format!("   Backend API: {}", BACKEND_URL),
        format!("   API Docs: {}", API_DOCS_URL),
        String::new(),
        "4. Default login credentials:".to_string(),
    ];
    lines.extend(
        DEMO_ACCOUNTS
            .iter()
            .map(|(role, email)| format!("   {}: {} / password", role, email)),
    );
    lines
}

/// Print the closing instructions.
pub fn show_instructions(ui: &mut dyn UserInterface, project: &Path, platform: Platform) {
    ui.show_header("Setup Complete!");
    ui.success("GearLog has been set up successfully!");
    for line in instruction_lines(project) {
        ui.message(&line);
    }

    ui.warning("Make sure MySQL is running before starting the backend!");
    if let Some(command) = mysql_start_command(platform) {
        ui.show_hint(command);
    }
}
