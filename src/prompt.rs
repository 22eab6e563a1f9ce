use crate::intent::ExecutionMode;

/// A fixed instruction template for the generation service.
///
/// Templates are immutable configuration data so the prompt builder can be
/// tested against alternate templates and identified by marker line.
pub struct PromptTemplate {
    pub name: &'static str,
    pub instructions: &'static str,
}

pub const SINGLE_ACTION: PromptTemplate = PromptTemplate {
    name: "single-action",
    instructions: r#"[single-action] You are a Linux shell assistant. Return only the shell command for the user's request.

- Do not explain anything.
- Do not include any additional text, context, or formatting outside the command.
- If the request asks for written content (a mail, a song, a dialog, code), write that content completely into the file; same for modifications.
- Always return a valid Linux command.
- For creating a single empty file, use `touch filename`; for a file with content, use `echo`.
- For creating a directory, use `mkdir -p directoryname`.
- For writing text into a file, use `echo` (e.g., `echo "text" > filename`).
- For creating a C++ file, use `echo` to write valid C++ code into a `.cpp` file.
- If the request installs software, updates packages, or modifies system settings, prepend `sudo`. This includes global `pip install`.
- If a command does not require `sudo`, generate it normally.
- Do NOT use bash expansions (e.g., `touch file{1..10}`) for multiple files; such requests are multi-step and must not be answered here.
- Example for a single file:
  User Request: Create a file named test.txt
  Response:
  ```bash
  touch test.txt
  ```
- Example for writing to a file:
  User Request: Write "Hello World" to test.txt
  Response:
  ```bash
  echo "Hello World" > test.txt
  ```"#,
};

pub const MULTI_STEP: PromptTemplate = PromptTemplate {
    name: "multi-step",
    instructions: r#"[multi-step] You are a Linux shell assistant. Return only the shell command for the user's request.

- Do not explain anything.
- Do not include any additional text, context, or formatting outside the command.
- Always return a valid Linux command.
- The request creates, deletes, or modifies multiple files (e.g., 'create 10 files named hi1 to 10', 'delete files new1.txt to new10.txt'):
  - Generate a command that writes a Python script named `action_script.py` performing the action.
  - Use `echo` to write the script content with proper indentation and valid Python syntax.
  - The script must:
    - Perform the requested action (create files with `open(filename, 'w').close()`, delete with `os.remove(filename)`, modify with file operations).
    - Tolerate per-item errors (skip missing files with `try/except FileNotFoundError` during deletion).
    - Delete itself with `os.remove(__file__)` at the end.
  - Execute the script with `python3 action_script.py`.
- Example for creating multiple files:
  User Request: create 10 files named hi1 to 10
  Response:
  ```bash
  echo "import os\nfiles = [f'hi{i}' for i in range(1, 11)]\nfor f in files:\n    open(f, 'w').close()\nos.remove(__file__)" > action_script.py; python3 action_script.py
  ```
- Example for deleting multiple files:
  User Request: delete files new1.txt to new10.txt
  Response:
  ```bash
  echo "import os\nfiles = [f'new{i}.txt' for i in range(1, 11)]\nfor f in files:\n    try:\n        os.remove(f)\n    except FileNotFoundError:\n        pass\nos.remove(__file__)" > action_script.py; python3 action_script.py
  ```
- Example for random file creation:
  User Request: create 2 files with random names
  Response:
  ```bash
  echo "import os\nimport random\nimport string\nfilenames = [''.join(random.choices(string.ascii_letters + string.digits, k=8)) + '.txt' for _ in range(2)]\nfor f in filenames:\n    open(f, 'w').close()\nos.remove(__file__)" > action_script.py; python3 action_script.py
  ```
- Avoid bash loops (e.g., `touch file{1..10}`) and Python one-liners (e.g., `python3 -c "..."`).
- Ensure the Python script uses proper indentation and valid syntax."#,
};

pub const EXPLICIT_HIERARCHY: PromptTemplate = PromptTemplate {
    name: "explicit-hierarchy",
    instructions: r#"[explicit-hierarchy] You are a Linux shell assistant. Return only the shell command for the user's request.

- Do not explain anything.
- Do not include any additional text, context, or formatting outside the command.
- Always return a valid Linux command.
- The user has specified a file structure (e.g., 'Folder1 > file1.txt' or 'Folder1 > Subfolder > file2.txt').
- Generate a command that writes a Python script named `action_script.py` creating the specified folder/file hierarchy.
- Use `echo` to write the script content with proper indentation and valid Python syntax.
- The script must:
  - Create directories with `os.makedirs(path, exist_ok=True)`.
  - Create files with `open(filename, 'w').close()`.
  - Delete itself with `os.remove(__file__)` at the end.
- Execute the script with `python3 action_script.py`.
- Example:
  User File Structure: Folder1 > file1.txt
  Response:
  ```bash
  echo "import os\nos.makedirs('Folder1', exist_ok=True)\nopen('Folder1/file1.txt', 'w').close()\nos.remove(__file__)" > action_script.py; python3 action_script.py
  ```
- Example with nested structure:
  User File Structure: Folder1 > Subfolder > file2.txt
  Response:
  ```bash
  echo "import os\nos.makedirs('Folder1/Subfolder', exist_ok=True)\nopen('Folder1/Subfolder/file2.txt', 'w').close()\nos.remove(__file__)" > action_script.py; python3 action_script.py
  ```
- Ensure the Python script uses proper indentation and valid syntax."#,
};

/// Select the template for an execution mode.
///
/// Templates are mutually exclusive and never merged; an explicit hierarchy
/// always wins over the other two.
pub fn template_for(mode: &ExecutionMode) -> &'static PromptTemplate {
    match mode {
        ExecutionMode::ExplicitHierarchy(_) => &EXPLICIT_HIERARCHY,
        ExecutionMode::MultiStep => &MULTI_STEP,
        ExecutionMode::SingleAction => &SINGLE_ACTION,
    }
}

/// Build the final prompt: the chosen template followed by the literal
/// request (and, for explicit hierarchies, the structure description).
///
/// The request is appended after the instruction block, never interpolated
/// into the middle of it, so the template text stays intact.
pub fn build_prompt(request: &str, mode: &ExecutionMode) -> String {
    let template = template_for(mode);
    let mut prompt = String::from(template.instructions);

    if let ExecutionMode::ExplicitHierarchy(spec) = mode {
        prompt.push_str(&format!("\n\nUser File Structure: {}", spec));
    }

    prompt.push_str(&format!(
        "\n\nNow respond to this request:\nUser Request: {}",
        request
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_action_template_selected() {
        let prompt = build_prompt("create a file named test.txt", &ExecutionMode::SingleAction);

        assert!(prompt.starts_with("[single-action]"));
        assert!(!prompt.contains("[multi-step]"));
        assert!(!prompt.contains("[explicit-hierarchy]"));
    }

    #[test]
    fn test_multi_step_template_selected() {
        let prompt = build_prompt("create 10 files named hi1 to 10", &ExecutionMode::MultiStep);

        assert!(prompt.starts_with("[multi-step]"));
        assert!(prompt.contains("action_script.py"));
        assert!(!prompt.contains("[single-action]"));
    }

    #[test]
    fn test_hierarchy_template_selected() {
        // The spec must be one that does not appear in the template's own
        // worked examples, so the assertion proves the append happened.
        let mode = ExecutionMode::explicit_hierarchy("Projects > docs > readme.txt");
        let prompt = build_prompt("set up my project", &mode);

        assert!(prompt.starts_with("[explicit-hierarchy]"));
        assert!(prompt.contains("User File Structure: Projects > docs > readme.txt"));
    }

    #[test]
    fn test_request_appended_verbatim_at_end() {
        let request = "Write \"Hello World\" to test.txt";
        let prompt = build_prompt(request, &ExecutionMode::SingleAction);

        assert!(prompt.ends_with(&format!("User Request: {}", request)));
    }

    #[test]
    fn test_hierarchy_spec_appended_after_instruction_block() {
        let mode = ExecutionMode::explicit_hierarchy("Alpha > beta.txt");
        let prompt = build_prompt("make it", &mode);

        // The instruction block itself is untouched; spec and request follow it.
        assert!(prompt.starts_with(EXPLICIT_HIERARCHY.instructions));
        let spec_pos = prompt.find("User File Structure: Alpha > beta.txt").unwrap();
        let req_pos = prompt.find("User Request: make it").unwrap();
        assert!(spec_pos < req_pos);
        assert!(spec_pos >= EXPLICIT_HIERARCHY.instructions.len());
    }

    #[test]
    fn test_templates_are_mutually_exclusive() {
        let markers = ["[single-action]", "[multi-step]", "[explicit-hierarchy]"];
        let modes = [
            ExecutionMode::SingleAction,
            ExecutionMode::MultiStep,
            ExecutionMode::explicit_hierarchy("A > b.txt"),
        ];

        for mode in &modes {
            let prompt = build_prompt("do something", mode);
            let count = markers.iter().filter(|m| prompt.contains(**m)).count();
            assert_eq!(count, 1, "exactly one template must be selected");
        }
    }
}
