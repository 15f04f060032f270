//! Offline generator returning canned answers

use log::{debug, error};
use serde_json::json;

use crate::request::{GenerationParameters, ModelResponse};

const PYTHON_QWEN: &str = r#"Here's an implementation of bubble sort in Python:

```python
def bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        swapped = False
        for j in range(0, n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
                swapped = True
        if not swapped:
            break
    return arr

numbers = [64, 34, 25, 12, 22, 11, 90]
print(f"Sorted: {bubble_sort(numbers.copy())}")
```

Time complexity: O(n^2), space complexity: O(1)."#;

const PYTHON_STARCODER: &str = r#"Here's a Python implementation of bubble sort with early exit:

```python
def optimized_bubble_sort(arr):
    n = len(arr)
    for i in range(n):
        already_sorted = True
        for j in range(n - i - 1):
            if arr[j] > arr[j + 1]:
                arr[j], arr[j + 1] = arr[j + 1], arr[j]
                already_sorted = False
        if already_sorted:
            break
    return arr
```"#;

const JAVASCRIPT_QWEN: &str = r#"Here's a JavaScript implementation of bubble sort:

```javascript
function bubbleSort(arr) {
    const n = arr.length;
    for (let i = 0; i < n; i++) {
        let swapped = false;
        for (let j = 0; j < n - i - 1; j++) {
            if (arr[j] > arr[j + 1]) {
                [arr[j], arr[j + 1]] = [arr[j + 1], arr[j]];
                swapped = true;
            }
        }
        if (!swapped) break;
    }
    return arr;
}

console.log('Sorted:', bubbleSort([64, 34, 25, 12, 22, 11, 90]));
```"#;

const JAVASCRIPT_STARCODER: &str = r#"Here's a bidirectional (cocktail) bubble sort in JavaScript:

```javascript
function optimizedBubbleSort(arr) {
    let start = 0;
    let end = arr.length - 1;
    while (start < end) {
        let swapped = false;
        for (let i = start; i < end; i++) {
            if (arr[i] > arr[i + 1]) {
                [arr[i], arr[i + 1]] = [arr[i + 1], arr[i]];
                swapped = true;
            }
        }
        if (!swapped) break;
        end--;
        for (let i = end - 1; i >= start; i--) {
            if (arr[i] > arr[i + 1]) {
                [arr[i], arr[i + 1]] = [arr[i + 1], arr[i]];
            }
        }
        start++;
    }
    return arr;
}
```"#;

const CPP_QWEN: &str = r#"Here's a C++ implementation of bubble sort:

```cpp
#include <iostream>
#include <vector>

void bubbleSort(std::vector<int>& arr) {
    const int n = static_cast<int>(arr.size());
    for (int i = 0; i < n; i++) {
        bool swapped = false;
        for (int j = 0; j < n - i - 1; j++) {
            if (arr[j] > arr[j + 1]) {
                std::swap(arr[j], arr[j + 1]);
                swapped = true;
            }
        }
        if (!swapped) break;
    }
}

int main() {
    std::vector<int> numbers = {64, 34, 25, 12, 22, 11, 90};
    bubbleSort(numbers);
    for (int num : numbers) std::cout << num << " ";
    std::cout << std::endl;
    return 0;
}
```"#;

const CPP_STARCODER: &str = r#"Here's a templated C++ bubble sort:

```cpp
#include <algorithm>
#include <vector>

template<typename T>
void optimizedBubbleSort(std::vector<T>& arr) {
    if (arr.empty()) return;
    std::size_t end = arr.size() - 1;
    bool swapped = true;
    while (swapped && end > 0) {
        swapped = false;
        for (std::size_t i = 0; i < end; ++i) {
            if (arr[i] > arr[i + 1]) {
                std::swap(arr[i], arr[i + 1]);
                swapped = true;
            }
        }
        --end;
    }
}
```"#;

/// Canned answer for a (language, model) pair
pub fn canned_response(language: &str, model: &str) -> Option<&'static str>
{   match (language.to_lowercase().as_str(), model.to_lowercase().as_str())
    {   ("python", "qwen") => Some(PYTHON_QWEN)
      , ("python", "starcoder") => Some(PYTHON_STARCODER)
      , ("javascript", "qwen") => Some(JAVASCRIPT_QWEN)
      , ("javascript", "starcoder") => Some(JAVASCRIPT_STARCODER)
      , ("cpp", "qwen") => Some(CPP_QWEN)
      , ("cpp", "starcoder") => Some(CPP_STARCODER)
      , _ => None
    }
}

/// Generator that never touches the network
#[derive(Debug, Clone, Default)]
pub struct MockCodeGenerationApi;

impl MockCodeGenerationApi
{   pub fn new() -> Self
    {   debug!("Initializing MockCodeGenerationApi");
        MockCodeGenerationApi
    }
}

impl crate::providers::CodeGenerator for MockCodeGenerationApi
{   async fn generate(
      &self
    , _session: &crate::providers::Session
    , _prompt: &str
    , model: &str
    , language: &str
    , params: &GenerationParameters
    ) -> ModelResponse
    {   debug!("Mock generation for language: {}, model: {}", language, model);
        debug!("Parameters: {:?}", params);

        match canned_response(language, model)
        {   Some(text) => ModelResponse::success(text, json!({}))
          , None => {
              error!("No mock response for {}/{}", language, model);
              ModelResponse::failure(
                crate::error::Error::NoMockResponse
                {   language: language.to_string()
                  , model: model.to_string()
                }
              , json!({})
              )
            }
        }
    }
}
