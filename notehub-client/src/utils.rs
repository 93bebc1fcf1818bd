use eyre::{Context, Result};
use std::io::{self, BufRead, Write};

pub fn read_input(name: &str) -> Result<String> {
    print!("Please enter {name}: ");
    io::stdout().flush().wrap_err("Failed to flush stdout")?;

    let mut value = String::new();
    io::stdin()
        .lock()
        .read_line(&mut value)
        .wrap_err_with(|| format!("Failed to read {name}"))?;

    Ok(value.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_input_hidden(name: &str) -> Result<String> {
    rpassword::prompt_password(format!("Please enter {name}: "))
        .wrap_err_with(|| format!("Failed to read {name}"))
}
