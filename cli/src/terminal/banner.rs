use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
         ____  __        __ ___  ___  ____   ____
        / ___| \ \      / /| __|| __||  _ \ |  _ \
        \___ \  \ \ /\ / / | _| | _| | |_) || |_) |
         ___) |  \ V  V /  |___||___||  __/ |  _ <
        |____/    \_/\_/             |_|    |_| \_\
"#;

pub fn print() {
    print::print(&format!("{}", BANNER.bright_green().bold()));
}
