// Cases for STDOUT_MACROS

fn leaks_token(token: &str) {
    println!("introspecting {}", token);
}

fn reports_failure(status: u16) {
    eprintln!("endpoint declined with {}", status);
}

fn partial_line() {
    std::print!("no newline");
}

fn inspects_result() {
    let active = true;
    dbg!(active);
}

// Allowed
fn traced(token_len: usize) {
    tracing::debug!(token_len, "introspecting token");
}

fn main() {
    leaks_token("abc123");
    reports_failure(401);
    partial_line();
    inspects_result();
    traced(6);
}
