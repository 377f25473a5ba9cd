/// Split a space separated argument string into individual arguments.
/// Single and double quotes group words, and are removed.
pub fn split_args<T: AsRef<str>>(line: T) -> Vec<String> {
    let mut args = vec![];
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;

    for ch in line.as_ref().chars() {
        match quote {
            Some(open) if ch == open => {
                quote = None;
            }
            Some(_) => {
                current.push(ch);
            }
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }

    if in_arg {
        args.push(current);
    }

    args
}
